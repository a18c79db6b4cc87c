//! SMTP delivery of trip emails.

use std::time::Duration;

use async_trait::async_trait;
use common::Email;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::service::{NotificationError, NotificationKind, NotificationService, TripContext};
use super::template::EmailMessage;

/// Upper bound on one SMTP conversation.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

fn mailbox(address: &Email) -> Result<Mailbox, NotificationError> {
    address
        .as_str()
        .parse()
        .map_err(|e: lettre::address::AddressError| NotificationError::Address {
            address: address.clone(),
            reason: e.to_string(),
        })
}

/// Notification service that sends plain-text email through an SMTP relay.
///
/// The connection is unencrypted and unauthenticated, which suits a relay on
/// the local network such as Mailpit or a sidecar MTA. Permanent SMTP
/// replies (5xx) become [`NotificationError::Rejected`]; connection problems
/// and transient replies become [`NotificationError::Transport`].
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Email,
    sender: Mailbox,
    relay: String,
}

impl SmtpMailer {
    /// Creates a mailer sending from `from` through `host:port`.
    ///
    /// No connection is made until the first email is sent.
    pub fn new(host: &str, port: u16, from: Email) -> Result<Self, NotificationError> {
        let sender = mailbox(&from)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .timeout(Some(SEND_TIMEOUT))
            .build();

        Ok(Self {
            transport,
            from,
            sender,
            relay: format!("{host}:{port}"),
        })
    }

    /// Returns the `host:port` of the relay.
    pub fn relay(&self) -> &str {
        &self.relay
    }

    async fn deliver(
        &self,
        kind: NotificationKind,
        to: &Email,
        trip: &TripContext,
    ) -> Result<(), NotificationError> {
        let rendered = EmailMessage::render(kind, &self.from, to, trip);
        let message = Message::builder()
            .from(self.sender.clone())
            .to(mailbox(to)?)
            .subject(rendered.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(rendered.body)
            .map_err(|e| NotificationError::Address {
                address: to.clone(),
                reason: e.to_string(),
            })?;

        match self.transport.send(message).await {
            Ok(_) => {
                tracing::debug!(%kind, relay = %self.relay, "email accepted by relay");
                Ok(())
            }
            Err(e) if e.is_permanent() => Err(NotificationError::Rejected {
                recipient: to.clone(),
                reason: e.to_string(),
            }),
            Err(e) => Err(NotificationError::Transport(e.to_string())),
        }
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("relay", &self.relay)
            .field("from", &self.from)
            .finish()
    }
}

#[async_trait]
impl NotificationService for SmtpMailer {
    async fn notify_trip_created(
        &self,
        owner_email: &Email,
        trip: &TripContext,
    ) -> Result<(), NotificationError> {
        self.deliver(NotificationKind::TripCreated, owner_email, trip)
            .await
    }

    async fn notify_invitation(
        &self,
        recipient: &Email,
        trip: &TripContext,
    ) -> Result<(), NotificationError> {
        self.deliver(NotificationKind::Invitation, recipient, trip)
            .await
    }
}
