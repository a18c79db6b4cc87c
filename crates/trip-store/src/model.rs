//! Row models for the trip store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ActivityId, Email, LinkId, ParticipantId, TripId};

/// A persisted trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub destination: String,
    pub owner_name: String,
    pub owner_email: Email,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_confirmed: bool,
}

/// Fields for a trip that has not been stored yet.
///
/// The store assigns the ID and starts the trip unconfirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrip {
    pub destination: String,
    pub owner_name: String,
    pub owner_email: Email,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl NewTrip {
    /// Materializes the trip row under the given ID.
    pub fn into_trip(self, id: TripId) -> Trip {
        Trip {
            id,
            destination: self.destination,
            owner_name: self.owner_name,
            owner_email: self.owner_email,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_confirmed: false,
        }
    }
}

/// Editable trip fields. The confirmation flag is never touched by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripUpdate {
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// A person associated with a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub trip_id: TripId,
    pub email: Email,
    pub is_confirmed: bool,
}

impl Participant {
    /// Creates an unconfirmed participant with a fresh ID.
    pub fn invited(trip_id: TripId, email: Email) -> Self {
        Self {
            id: ParticipantId::new(),
            trip_id,
            email,
            is_confirmed: false,
        }
    }
}

/// A scheduled activity on a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub trip_id: TripId,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

/// Fields for an activity that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

/// A shareable link attached to a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub trip_id: TripId,
    pub title: String,
    pub url: String,
}

/// Fields for a link that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub title: String,
    pub url: String,
}
