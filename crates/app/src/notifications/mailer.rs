//! Mail delivery
//!
//! [`Mailer`] is the seam to an outbound mail provider. [`LogMailer`] records messages in the
//! log instead of sending them, which is what local and test environments run with.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// A plain-text message, optionally with an HTML alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

/// Provider-assigned identifier for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("recipient address is empty")]
    MissingRecipient,

    #[error("mail provider rejected the message: {0}")]
    Rejected(String),
}

#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Hand a message to the provider.
    async fn send(&self, mail: Mail) -> Result<MessageId, MailerError>;
}

/// Writes each message to the log with a generated id.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    #[must_use]
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: Mail) -> Result<MessageId, MailerError> {
        if mail.to.trim().is_empty() {
            return Err(MailerError::MissingRecipient);
        }

        let id = MessageId(format!("log-{}", Uuid::now_v7()));

        info!(
            message_id = %id,
            from = %self.from,
            to = %mail.to,
            subject = %mail.subject,
            "mail accepted"
        );

        Ok(id)
    }
}
