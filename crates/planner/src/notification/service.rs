//! Notification service trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Email, TripId};
use thiserror::Error;
use trip_store::Trip;

/// Trip details a notification template can refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripContext {
    pub trip_id: TripId,
    pub destination: String,
    pub owner_name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl From<&Trip> for TripContext {
    fn from(trip: &Trip) -> Self {
        Self {
            trip_id: trip.id,
            destination: trip.destination.clone(),
            owner_name: trip.owner_name.clone(),
            starts_at: trip.starts_at,
            ends_at: trip.ends_at,
        }
    }
}

/// The template a notification is rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Sent to the owner once the trip has been created.
    TripCreated,
    /// Sent to a participant invited to the trip.
    Invitation,
}

impl NotificationKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::TripCreated => "trip_created",
            NotificationKind::Invitation => "invitation",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors reported by a notification service.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// The recipient or message was refused.
    #[error("Notification to {recipient} rejected: {reason}")]
    Rejected { recipient: Email, reason: String },

    /// An address could not be used in a mail header.
    #[error("Address {address} cannot be used for email: {reason}")]
    Address { address: Email, reason: String },

    /// The mail relay could not be reached or failed mid-transaction.
    #[error("Notification transport error: {0}")]
    Transport(String),
}

/// Trait for sending trip emails.
///
/// One call is one delivery attempt; callers do not retry.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Tells the owner that their trip has been created.
    async fn notify_trip_created(
        &self,
        owner_email: &Email,
        trip: &TripContext,
    ) -> Result<(), NotificationError>;

    /// Invites a participant to the trip.
    async fn notify_invitation(
        &self,
        recipient: &Email,
        trip: &TripContext,
    ) -> Result<(), NotificationError>;
}
