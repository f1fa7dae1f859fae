//! Users service.

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, instrument};

use crate::{
    database::Db,
    domain::users::{
        errors::UsersServiceError,
        models::{User, UserUuid},
        repository::PgUsersRepository,
    },
    pagination::{Page, PageRequest},
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let (users, total) = self.repository.list_users(&mut tx, page).await?;

        tx.commit().await?;

        Ok(Page::new(users, total, page))
    }

    #[instrument(skip(self))]
    async fn set_blocked(&self, user: UserUuid, blocked: bool) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.set_blocked(&mut tx, user, blocked).await?;

        tx.commit().await?;

        info!(%user, blocked, "user block flag updated");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<User, UsersServiceError>;

    /// List users, newest first.
    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, UsersServiceError>;

    /// Block or unblock a user. Blocked users cannot log in or use their token.
    async fn set_blocked(&self, user: UserUuid, blocked: bool) -> Result<User, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::create_user};

    use super::*;

    #[tokio::test]
    async fn get_user_returns_created_user() -> TestResult {
        let ctx = TestContext::new().await;
        let created = create_user(&ctx, "asha@example.com").await?;

        let user = ctx.users.get_user(created.uuid).await?;

        assert_eq!(user, created);
        assert!(!user.is_blocked);

        Ok(())
    }

    #[tokio::test]
    async fn get_user_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.users.get_user(UserUuid::new()).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn set_blocked_toggles_flag() -> TestResult {
        let ctx = TestContext::new().await;
        let created = create_user(&ctx, "ravi@example.com").await?;

        let blocked = ctx.users.set_blocked(created.uuid, true).await?;
        assert!(blocked.is_blocked);

        let unblocked = ctx.users.set_blocked(created.uuid, false).await?;
        assert!(!unblocked.is_blocked);

        Ok(())
    }

    #[tokio::test]
    async fn list_users_pages_newest_first() -> TestResult {
        let ctx = TestContext::new().await;

        create_user(&ctx, "first@example.com").await?;
        let second = create_user(&ctx, "second@example.com").await?;

        let page = ctx.users.list_users(PageRequest::new(Some(1), Some(1))).await?;

        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items.first().map(|u| u.uuid), Some(second.uuid));

        Ok(())
    }
}
