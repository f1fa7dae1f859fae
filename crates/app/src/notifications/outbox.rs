//! Notification outbox
//!
//! Services hand events to a [`Notifier`] and move on. The [`OutboxNotifier`] queues them on
//! an unbounded channel; a background task renders each event into mail and sends it.
//! Delivery failures are logged and dropped.

use std::sync::Arc;

use mockall::automock;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use crate::notifications::{
    events::NotificationEvent,
    mailer::{Mail, Mailer},
    templates,
};

/// Accepts events without blocking or failing the caller.
#[automock]
pub trait Notifier: Send + Sync {
    fn emit(&self, event: NotificationEvent);
}

/// Sender details used when rendering mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub brand: String,

    /// Receives new-order alerts. Alerts are skipped when unset.
    pub store_admin_email: Option<String>,
}

/// Channel-backed [`Notifier`].
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    sender: mpsc::UnboundedSender<NotificationEvent>,
}

impl Notifier for OutboxNotifier {
    fn emit(&self, event: NotificationEvent) {
        let kind = event.kind();

        if self.sender.send(event).is_err() {
            warn!(kind, "notification outbox is closed; event dropped");
        }
    }
}

/// Mail produced by one event.
#[must_use]
pub fn render(event: &NotificationEvent, settings: &MailSettings) -> Vec<Mail> {
    match event {
        NotificationEvent::OtpIssued(message) => {
            vec![templates::otp_mail(message, &settings.brand)]
        }
        NotificationEvent::OrderPlaced { order, customer } => {
            let mut mails = Vec::with_capacity(2);

            if let Some(admin_email) = settings.store_admin_email.as_deref() {
                mails.push(templates::admin_new_order(
                    order,
                    customer,
                    &settings.brand,
                    admin_email,
                ));
            }

            mails.push(templates::customer_order_confirmed(
                order,
                customer,
                &settings.brand,
            ));

            mails
        }
        NotificationEvent::OrderStatusChanged {
            order,
            customer,
            from,
            to,
        } => vec![templates::customer_status_changed(
            order,
            customer,
            *from,
            *to,
            &settings.brand,
        )],
    }
}

/// Start the delivery task. It runs until every [`OutboxNotifier`] clone is dropped.
#[must_use]
pub fn spawn_outbox(
    mailer: Arc<dyn Mailer>,
    settings: MailSettings,
) -> (OutboxNotifier, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::unbounded_channel::<NotificationEvent>();

    let handle = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            for mail in render(&event, &settings) {
                let to = mail.to.clone();

                match mailer.send(mail).await {
                    Ok(id) => debug!(kind = event.kind(), message_id = %id, "notification sent"),
                    Err(error) => warn!(kind = event.kind(), %to, %error, "notification failed"),
                }
            }
        }
    });

    (OutboxNotifier { sender }, handle)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use zeroize::Zeroizing;

    use crate::{
        auth::otp::OtpPurpose,
        notifications::{
            events::OtpMessage,
            mailer::{MailerError, MessageId, MockMailer},
        },
    };

    use super::*;

    fn settings() -> MailSettings {
        MailSettings {
            brand: "Karat".to_string(),
            store_admin_email: Some("store@example.com".to_string()),
        }
    }

    fn otp_event(to: &str) -> NotificationEvent {
        NotificationEvent::OtpIssued(OtpMessage {
            to: to.to_string(),
            purpose: OtpPurpose::AdminLogin,
            code: Zeroizing::new("111222".to_string()),
        })
    }

    #[tokio::test]
    async fn outbox_delivers_queued_events() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .withf(|mail| mail.to == "admin@example.com" && mail.subject == "Admin Login OTP")
            .times(1)
            .returning(|_| Ok(MessageId("m-1".to_string())));

        let (notifier, handle) = spawn_outbox(Arc::new(mailer), settings());

        notifier.emit(otp_event("admin@example.com"));
        drop(notifier);

        handle.await?;

        Ok(())
    }

    #[tokio::test]
    async fn mail_failures_do_not_stop_the_outbox() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(2)
            .returning(|_| Err(MailerError::Rejected("mailbox full".to_string())));

        let (notifier, handle) = spawn_outbox(Arc::new(mailer), settings());

        notifier.emit(otp_event("one@example.com"));
        notifier.emit(otp_event("two@example.com"));
        drop(notifier);

        handle.await?;

        Ok(())
    }

    #[test]
    fn otp_event_renders_single_mail() {
        let mails = render(&otp_event("asha@example.com"), &settings());

        assert_eq!(mails.len(), 1);
        assert_eq!(
            mails.first().map(|mail| mail.to.as_str()),
            Some("asha@example.com")
        );
    }
}
