use async_trait::async_trait;

use crate::{
    Activity, Email, Link, NewActivity, NewLink, NewTrip, Participant, ParticipantId, Result,
    Trip, TripId, TripUpdate,
};

/// Core trait for trip persistence.
///
/// Single-row operations are atomic on their own; trip creation is the one
/// multi-row operation and must commit all rows or none.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Stores a trip together with one unconfirmed participant per email.
    ///
    /// The email list is expected to already contain the owner. Either the
    /// trip and every participant are committed, or nothing is.
    async fn create_trip_with_participants(
        &self,
        trip: NewTrip,
        participant_emails: Vec<Email>,
    ) -> Result<Trip>;

    /// Loads a trip. Returns None if it doesn't exist.
    async fn get_trip(&self, trip_id: TripId) -> Result<Option<Trip>>;

    /// Overwrites the editable fields of a trip.
    ///
    /// Fails with `TripNotFound` if the trip doesn't exist.
    async fn update_trip(&self, trip_id: TripId, update: TripUpdate) -> Result<()>;

    /// Marks a trip as confirmed. Confirming twice is not an error.
    ///
    /// Fails with `TripNotFound` if the trip doesn't exist.
    async fn set_trip_confirmed(&self, trip_id: TripId) -> Result<()>;

    /// Loads a participant. Returns None if it doesn't exist.
    async fn get_participant(&self, participant_id: ParticipantId)
    -> Result<Option<Participant>>;

    /// Flips a participant's confirmation flag if it is still unset.
    ///
    /// Returns `true` when this call performed the flip and `false` when the
    /// participant was already confirmed or doesn't exist.
    async fn confirm_participant(&self, participant_id: ParticipantId) -> Result<bool>;

    /// Lists a trip's participants in the order they were added.
    async fn list_participants(&self, trip_id: TripId) -> Result<Vec<Participant>>;

    /// Adds an unconfirmed participant to an existing trip.
    ///
    /// Fails with `TripNotFound` if the trip doesn't exist.
    async fn add_participant(&self, trip_id: TripId, email: Email) -> Result<Participant>;

    /// Adds an activity to an existing trip.
    async fn create_activity(&self, trip_id: TripId, activity: NewActivity) -> Result<Activity>;

    /// Lists a trip's activities ordered by `occurs_at`.
    async fn list_activities(&self, trip_id: TripId) -> Result<Vec<Activity>>;

    /// Adds a link to an existing trip.
    async fn create_link(&self, trip_id: TripId, link: NewLink) -> Result<Link>;

    /// Lists a trip's links in the order they were added.
    async fn list_links(&self, trip_id: TripId) -> Result<Vec<Link>>;
}
