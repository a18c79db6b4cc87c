//! Fallback mailer used when no SMTP relay is configured.

use async_trait::async_trait;
use common::Email;

use super::service::{NotificationError, NotificationKind, NotificationService, TripContext};
use super::template::EmailMessage;

/// Notification service that sends nothing.
///
/// Each email is rendered and dropped, leaving a `debug` event with the kind,
/// recipient and subject. The API binary falls back to it when `SMTP_HOST` is
/// unset; use [`SmtpMailer`](super::SmtpMailer) to actually deliver mail.
#[derive(Debug, Clone)]
pub struct TracingMailer {
    from: Email,
}

impl TracingMailer {
    /// Creates a mailer sending from the given address.
    pub fn new(from: Email) -> Self {
        Self { from }
    }

    /// Returns the sender address.
    pub fn sender(&self) -> &Email {
        &self.from
    }

    fn deliver(
        &self,
        kind: NotificationKind,
        to: &Email,
        trip: &TripContext,
    ) -> Result<(), NotificationError> {
        let message = EmailMessage::render(kind, &self.from, to, trip);
        tracing::debug!(
            kind = %kind,
            to = %message.to,
            subject = %message.subject,
            "email not sent: no relay configured"
        );
        Ok(())
    }
}

#[async_trait]
impl NotificationService for TracingMailer {
    async fn notify_trip_created(
        &self,
        owner_email: &Email,
        trip: &TripContext,
    ) -> Result<(), NotificationError> {
        self.deliver(NotificationKind::TripCreated, owner_email, trip)
    }

    async fn notify_invitation(
        &self,
        recipient: &Email,
        trip: &TripContext,
    ) -> Result<(), NotificationError> {
        self.deliver(NotificationKind::Invitation, recipient, trip)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use common::TripId;

    use super::*;

    #[tokio::test]
    async fn test_fallback_mailer_reports_success_without_relay() {
        let mailer = TracingMailer::new(Email::parse("noreply@x.com").unwrap());
        let trip = TripContext {
            trip_id: TripId::new(),
            destination: "Paris".to_string(),
            owner_name: "Ana".to_string(),
            starts_at: Utc::now(),
            ends_at: Utc::now(),
        };
        let to = Email::parse("a@x.com").unwrap();

        assert!(mailer.notify_trip_created(&to, &trip).await.is_ok());
        assert!(mailer.notify_invitation(&to, &trip).await.is_ok());
        assert_eq!(mailer.sender().as_str(), "noreply@x.com");
    }
}
