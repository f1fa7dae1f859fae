//! Notifications Config

use clap::Args;

/// Outgoing mail settings.
#[derive(Debug, Args)]
pub struct NotificationsConfig {
    /// Sender address for outgoing mail
    #[arg(long, env = "MAIL_FROM", default_value = "Karat <no-reply@karat.local>")]
    pub mail_from: String,

    /// Brand name used in mail subjects and bodies
    #[arg(long, env = "MAIL_BRAND", default_value = "Karat")]
    pub brand: String,

    /// Receives new-order alerts
    #[arg(long, env = "STORE_ADMIN_EMAIL")]
    pub store_admin_email: Option<String>,
}
