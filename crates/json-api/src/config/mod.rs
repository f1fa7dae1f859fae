//! Server configuration module

use clap::Parser;
use karat_app::context::AppSettings;

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    notifications::NotificationsConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentsConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod notifications;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod server;

/// Karat JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "karat-json", about = "Karat JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Token signing and admin login settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Razorpay settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,

    /// Outgoing mail settings.
    #[command(flatten)]
    pub notifications: NotificationsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings the app context is built from.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            database_url: self.database.database_url.clone(),
            jwt_secret: self.auth.jwt_secret(),
            auth: self.auth.settings(),
            razorpay: self.payments.razorpay(),
            mail_from: self.notifications.mail_from.clone(),
            brand: self.notifications.brand.clone(),
            store_admin_email: self.notifications.store_admin_email.clone(),
            migrate: self.database.run_migrations,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_when_only_required_values_are_given() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "karat-json",
            "--database-url",
            "postgres://localhost/karat",
            "--jwt-secret",
            "secret",
        ])?;

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.observability.slow_request_threshold_ms, 1_000);
        assert!(!config.auth.expose_otp, "OTP exposure must be opt-in");
        assert!(
            config.payments.razorpay().is_none(),
            "razorpay should be disabled without keys"
        );

        let settings = config.app_settings();

        assert!(!settings.migrate, "migrations must be opt-in");
        assert_eq!(settings.brand, "Karat");

        Ok(())
    }
}
