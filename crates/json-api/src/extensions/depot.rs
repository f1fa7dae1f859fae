//! Depot helper extensions.

use std::any::Any;

use karat_app::{auth::Principal, domain::users::models::UserUuid};
use salvo::prelude::{Depot, StatusError};

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_principal(&mut self, principal: Principal);

    fn principal_or_401(&self) -> Result<&Principal, StatusError>;

    /// The calling customer. Admin tokens are refused.
    fn user_uuid_or_403(&self) -> Result<UserUuid, StatusError>;

    /// The calling admin's email. Customer tokens are refused.
    fn admin_email_or_403(&self) -> Result<&str, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.inject(principal);
    }

    fn principal_or_401(&self) -> Result<&Principal, StatusError> {
        self.obtain::<Principal>()
            .map_err(|_ignored| StatusError::unauthorized().brief("Unauthorized"))
    }

    fn user_uuid_or_403(&self) -> Result<UserUuid, StatusError> {
        match self.principal_or_401()? {
            Principal::User { uuid } => Ok(*uuid),
            Principal::Admin { .. } => Err(StatusError::forbidden().brief("Forbidden")),
        }
    }

    fn admin_email_or_403(&self) -> Result<&str, StatusError> {
        match self.principal_or_401()? {
            Principal::Admin { email } => Ok(email),
            Principal::User { .. } => Err(StatusError::forbidden().brief("Forbidden")),
        }
    }
}
