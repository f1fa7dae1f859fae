//! Notifications

pub mod events;
pub mod mailer;
pub mod outbox;
pub mod templates;

pub use events::{NotificationEvent, OtpMessage};
pub use mailer::{LogMailer, Mail, Mailer, MailerError, MessageId};
pub use outbox::{MailSettings, MockNotifier, Notifier, OutboxNotifier, spawn_outbox};
