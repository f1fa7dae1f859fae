//! Auth service.
//!
//! Admins log in with the configured email and password followed by an emailed code. Customers
//! are passwordless: signup and login each send a code, and a verified code yields a bearer token.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};
use zeroize::Zeroizing;

use crate::{
    auth::{
        AuthServiceError,
        otp::{OtpCheck, OtpEntry, OtpPayload, OtpPurpose, OtpStore},
        tokens::{IssuedToken, Principal, TokenIssuer},
    },
    database::Db,
    domain::users::{
        models::{NewUser, User, UserUuid, normalize_email},
        repository::PgUsersRepository,
    },
    notifications::{NotificationEvent, Notifier, OtpMessage},
};

/// Admin credentials and OTP exposure.
#[derive(Clone, Default)]
pub struct AuthSettings {
    pub admin_email: Option<String>,
    pub admin_password: Option<Zeroizing<String>>,

    /// Return issued codes in responses. Never enable in production.
    pub expose_otp: bool,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "**redacted**"))
            .field("expose_otp", &self.expose_otp)
            .finish()
    }
}

/// Result of an init step. `otp` is only set when codes are exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpDispatch {
    pub otp: Option<Zeroizing<String>>,
}

/// A verified customer and their bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: IssuedToken,
}

#[derive(Clone)]
pub struct PgAuthService {
    db: Db,
    users: PgUsersRepository,
    otp: Arc<dyn OtpStore>,
    tokens: TokenIssuer,
    settings: AuthSettings,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for PgAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgAuthService")
            .field("db", &self.db)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PgAuthService {
    #[must_use]
    pub fn new(
        db: Db,
        tokens: TokenIssuer,
        otp: Arc<dyn OtpStore>,
        settings: AuthSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            db,
            users: PgUsersRepository::new(),
            otp,
            tokens,
            settings,
            notifier,
        }
    }

    fn admin_email(&self) -> Result<String, AuthServiceError> {
        self.settings
            .admin_email
            .as_deref()
            .and_then(normalize_email)
            .ok_or(AuthServiceError::NotConfigured)
    }

    async fn issue_otp(&self, purpose: OtpPurpose, email: &str, payload: OtpPayload) -> OtpDispatch {
        let entry = OtpEntry::issue(purpose, payload, Timestamp::now());
        let code = entry.code.clone();

        self.otp.set(&purpose.store_key(email), entry).await;

        self.notifier.emit(NotificationEvent::OtpIssued(OtpMessage {
            to: email.to_string(),
            purpose,
            code: code.clone(),
        }));

        OtpDispatch {
            otp: self.settings.expose_otp.then_some(code),
        }
    }

    /// Check a code, keeping the entry only when another attempt is allowed.
    async fn check_otp(
        &self,
        purpose: OtpPurpose,
        email: &str,
        submitted: &str,
    ) -> Result<OtpPayload, AuthServiceError> {
        let key = purpose.store_key(email);

        let mut entry = self
            .otp
            .get(&key)
            .await
            .ok_or(AuthServiceError::OtpNotRequested)?;

        match entry.check(purpose, submitted, Timestamp::now()) {
            OtpCheck::Accepted(payload) => {
                self.otp.delete(&key).await;

                Ok(payload)
            }
            OtpCheck::Discard(failure) => {
                self.otp.delete(&key).await;

                Err(failure.into())
            }
            OtpCheck::Retry(failure) => {
                self.otp.set(&key, entry).await;

                Err(failure.into())
            }
        }
    }

    fn session(&self, user: User) -> Result<Session, AuthServiceError> {
        let token = self
            .tokens
            .issue(&Principal::User { uuid: user.uuid }, Timestamp::now())?;

        Ok(Session { user, token })
    }
}

fn parse_email(raw: &str) -> Result<String, AuthServiceError> {
    normalize_email(raw).ok_or(AuthServiceError::InvalidEmail)
}

#[async_trait]
impl AuthService for PgAuthService {
    #[instrument(skip(self, password))]
    async fn admin_login_init(
        &self,
        email_address: &str,
        password: &str,
    ) -> Result<OtpDispatch, AuthServiceError> {
        let admin_email = self.admin_email()?;
        let admin_password = self
            .settings
            .admin_password
            .as_ref()
            .ok_or(AuthServiceError::NotConfigured)?;

        let email = parse_email(email_address)?;

        let password_matches: bool = password.as_bytes().ct_eq(admin_password.as_bytes()).into();

        if email != admin_email || !password_matches {
            warn!("admin login rejected");

            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(self
            .issue_otp(OtpPurpose::AdminLogin, &email, OtpPayload::None)
            .await)
    }

    #[instrument(skip(self, otp))]
    async fn admin_login_verify(
        &self,
        email_address: &str,
        otp: &str,
    ) -> Result<IssuedToken, AuthServiceError> {
        let email = parse_email(email_address)?;

        self.check_otp(OtpPurpose::AdminLogin, &email, otp).await?;

        if email != self.admin_email()? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(&Principal::Admin { email }, Timestamp::now())?;

        info!("admin logged in");

        Ok(token)
    }

    #[instrument(skip(self, full_name))]
    async fn signup_init(
        &self,
        email_address: &str,
        full_name: &str,
    ) -> Result<OtpDispatch, AuthServiceError> {
        let email = parse_email(email_address)?;
        let full_name = full_name.trim();

        if full_name.is_empty() {
            return Err(AuthServiceError::MissingFullName);
        }

        let mut tx = self.db.begin().await?;

        let existing = self.users.find_user_by_email(&mut tx, &email).await?;

        tx.commit().await?;

        if existing.is_some() {
            return Err(AuthServiceError::AlreadyRegistered);
        }

        Ok(self
            .issue_otp(
                OtpPurpose::UserSignup,
                &email,
                OtpPayload::Signup {
                    full_name: full_name.to_string(),
                },
            )
            .await)
    }

    #[instrument(skip(self, otp))]
    async fn signup_verify(
        &self,
        email_address: &str,
        otp: &str,
    ) -> Result<Session, AuthServiceError> {
        let email = parse_email(email_address)?;

        let OtpPayload::Signup { full_name } =
            self.check_otp(OtpPurpose::UserSignup, &email, otp).await?
        else {
            return Err(AuthServiceError::OtpNotRequested);
        };

        let mut tx = self.db.begin().await?;

        if self
            .users
            .find_user_by_email(&mut tx, &email)
            .await?
            .is_some()
        {
            return Err(AuthServiceError::AlreadyRegistered);
        }

        let user = self
            .users
            .create_user(
                &mut tx,
                &NewUser {
                    uuid: UserUuid::new(),
                    email,
                    full_name,
                },
            )
            .await?;

        tx.commit().await?;

        info!(user_uuid = %user.uuid, "user signed up");

        self.session(user)
    }

    #[instrument(skip(self))]
    async fn login_init(&self, email_address: &str) -> Result<OtpDispatch, AuthServiceError> {
        let email = parse_email(email_address)?;

        let mut tx = self.db.begin().await?;

        let user = self
            .users
            .find_user_by_email(&mut tx, &email)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        tx.commit().await?;

        if user.is_blocked {
            return Err(AuthServiceError::Blocked);
        }

        Ok(self
            .issue_otp(
                OtpPurpose::UserLogin,
                &email,
                OtpPayload::Login { user: user.uuid },
            )
            .await)
    }

    #[instrument(skip(self, otp))]
    async fn login_verify(
        &self,
        email_address: &str,
        otp: &str,
    ) -> Result<Session, AuthServiceError> {
        let email = parse_email(email_address)?;

        let OtpPayload::Login { user } = self.check_otp(OtpPurpose::UserLogin, &email, otp).await?
        else {
            return Err(AuthServiceError::OtpNotRequested);
        };

        let mut tx = self.db.begin().await?;

        let user = self
            .users
            .get_user(&mut tx, user)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => AuthServiceError::UserNotFound,
                other => AuthServiceError::from(other),
            })?;

        tx.commit().await?;

        if user.is_blocked {
            return Err(AuthServiceError::Blocked);
        }

        info!(user_uuid = %user.uuid, "user logged in");

        self.session(user)
    }

    async fn authenticate(&self, token: &str) -> Result<Principal, AuthServiceError> {
        let principal = self
            .tokens
            .verify(token)
            .map_err(|_| AuthServiceError::InvalidToken)?;

        match &principal {
            Principal::Admin { email } => {
                if self.admin_email().ok().as_ref() != Some(email) {
                    return Err(AuthServiceError::InvalidToken);
                }
            }
            Principal::User { uuid } => {
                let mut tx = self.db.begin().await?;

                let user = self
                    .users
                    .get_user(&mut tx, *uuid)
                    .await
                    .map_err(|error| match error {
                        sqlx::Error::RowNotFound => AuthServiceError::InvalidToken,
                        other => AuthServiceError::from(other),
                    })?;

                tx.commit().await?;

                if user.is_blocked {
                    return Err(AuthServiceError::Blocked);
                }
            }
        }

        Ok(principal)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check the admin credentials and email a login code.
    async fn admin_login_init(
        &self,
        email: &str,
        password: &str,
    ) -> Result<OtpDispatch, AuthServiceError>;

    /// Exchange an admin login code for a one-day admin token.
    async fn admin_login_verify(&self, email: &str, otp: &str)
    -> Result<IssuedToken, AuthServiceError>;

    /// Email a signup code to an address that has no account yet.
    async fn signup_init(&self, email: &str, full_name: &str)
    -> Result<OtpDispatch, AuthServiceError>;

    /// Create the account and return a one-week user token.
    async fn signup_verify(&self, email: &str, otp: &str) -> Result<Session, AuthServiceError>;

    /// Email a login code to an existing, unblocked customer.
    async fn login_init(&self, email: &str) -> Result<OtpDispatch, AuthServiceError>;

    async fn login_verify(&self, email: &str, otp: &str) -> Result<Session, AuthServiceError>;

    /// Resolve a bearer token. User tokens are re-checked against the account.
    async fn authenticate(&self, token: &str) -> Result<Principal, AuthServiceError>;
}
