//! In-memory notification service for testing.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{Email, TripId};

use super::service::{NotificationError, NotificationKind, NotificationService, TripContext};

/// A delivery attempt recorded by the in-memory service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub kind: NotificationKind,
    pub recipient: Email,
    pub trip_id: TripId,
    pub delivered: bool,
}

#[derive(Debug, Default)]
struct InMemoryNotificationState {
    attempts: Vec<SentNotification>,
    failing_kinds: HashSet<NotificationKind>,
    failing_recipients: HashSet<Email>,
}

/// In-memory notification service for testing.
///
/// Records every attempt, including the ones it was told to fail.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationService {
    state: Arc<RwLock<InMemoryNotificationState>>,
}

impl InMemoryNotificationService {
    /// Creates a new in-memory notification service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures every notification of a kind to fail.
    pub fn set_fail_on(&self, kind: NotificationKind, fail: bool) {
        let mut state = self.state.write().unwrap();
        if fail {
            state.failing_kinds.insert(kind);
        } else {
            state.failing_kinds.remove(&kind);
        }
    }

    /// Configures every notification to one recipient to fail.
    pub fn set_fail_for(&self, recipient: &Email, fail: bool) {
        let mut state = self.state.write().unwrap();
        if fail {
            state.failing_recipients.insert(recipient.clone());
        } else {
            state.failing_recipients.remove(recipient);
        }
    }

    /// Returns every attempt in the order it was made.
    pub fn attempts(&self) -> Vec<SentNotification> {
        self.state.read().unwrap().attempts.clone()
    }

    /// Returns the attempts that succeeded.
    pub fn delivered(&self) -> Vec<SentNotification> {
        self.attempts().into_iter().filter(|n| n.delivered).collect()
    }

    /// Returns the number of attempts of a kind.
    pub fn attempt_count(&self, kind: NotificationKind) -> usize {
        self.state
            .read()
            .unwrap()
            .attempts
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }

    fn record(
        &self,
        kind: NotificationKind,
        recipient: &Email,
        trip: &TripContext,
    ) -> Result<(), NotificationError> {
        let mut state = self.state.write().unwrap();
        let fail =
            state.failing_kinds.contains(&kind) || state.failing_recipients.contains(recipient);

        state.attempts.push(SentNotification {
            kind,
            recipient: recipient.clone(),
            trip_id: trip.trip_id,
            delivered: !fail,
        });

        if fail {
            return Err(NotificationError::Rejected {
                recipient: recipient.clone(),
                reason: "Mailbox unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationService for InMemoryNotificationService {
    async fn notify_trip_created(
        &self,
        owner_email: &Email,
        trip: &TripContext,
    ) -> Result<(), NotificationError> {
        self.record(NotificationKind::TripCreated, owner_email, trip)
    }

    async fn notify_invitation(
        &self,
        recipient: &Email,
        trip: &TripContext,
    ) -> Result<(), NotificationError> {
        self.record(NotificationKind::Invitation, recipient, trip)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn context() -> TripContext {
        TripContext {
            trip_id: TripId::new(),
            destination: "Paris".to_string(),
            owner_name: "Ana".to_string(),
            starts_at: Utc::now(),
            ends_at: Utc::now(),
        }
    }

    fn email(value: &str) -> Email {
        Email::parse(value).unwrap()
    }

    #[tokio::test]
    async fn test_records_delivered_attempts() {
        let service = InMemoryNotificationService::new();
        let trip = context();

        service
            .notify_trip_created(&email("a@x.com"), &trip)
            .await
            .unwrap();
        service
            .notify_invitation(&email("b@x.com"), &trip)
            .await
            .unwrap();

        let attempts = service.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].kind, NotificationKind::TripCreated);
        assert_eq!(attempts[1].recipient.as_str(), "b@x.com");
        assert!(attempts.iter().all(|n| n.delivered && n.trip_id == trip.trip_id));
    }

    #[tokio::test]
    async fn test_fail_on_kind() {
        let service = InMemoryNotificationService::new();
        service.set_fail_on(NotificationKind::Invitation, true);

        let result = service.notify_invitation(&email("b@x.com"), &context()).await;

        assert!(matches!(result, Err(NotificationError::Rejected { .. })));
        assert_eq!(service.attempt_count(NotificationKind::Invitation), 1);
        assert!(service.delivered().is_empty());
    }

    #[tokio::test]
    async fn test_fail_for_recipient_only() {
        let service = InMemoryNotificationService::new();
        let blocked = email("blocked@x.com");
        service.set_fail_for(&blocked, true);
        let trip = context();

        assert!(service.notify_invitation(&blocked, &trip).await.is_err());
        assert!(service.notify_invitation(&email("ok@x.com"), &trip).await.is_ok());
        assert_eq!(service.delivered().len(), 1);
    }
}
