//! Auth Config

use clap::Args;
use karat_app::auth::AuthSettings;
use zeroize::Zeroizing;

/// Token signing and admin login settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Secret used to sign bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Email address allowed to log in as admin
    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: Option<String>,

    /// Admin password, checked before the login code is sent
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Return login codes in API responses (development only)
    #[arg(long, env = "EXPOSE_OTP", default_value_t = false)]
    pub expose_otp: bool,
}

impl AuthConfig {
    /// Signing secret, wiped from memory when dropped.
    #[must_use]
    pub fn jwt_secret(&self) -> Zeroizing<String> {
        Zeroizing::new(self.jwt_secret.clone())
    }

    /// Settings for the auth service.
    #[must_use]
    pub fn settings(&self) -> AuthSettings {
        AuthSettings {
            admin_email: self.admin_email.clone(),
            admin_password: self.admin_password.clone().map(Zeroizing::new),
            expose_otp: self.expose_otp,
        }
    }
}
