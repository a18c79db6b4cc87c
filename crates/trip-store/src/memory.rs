use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Activity, ActivityId, Email, Link, LinkId, NewActivity, NewLink, NewTrip, Participant,
    ParticipantId, Result, StoreError, Trip, TripId, TripUpdate,
    store::TripStore,
};

/// Store operations that can be made to fail in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    CreateTrip,
    GetTrip,
    UpdateTrip,
    SetTripConfirmed,
    GetParticipant,
    ConfirmParticipant,
    ListParticipants,
    AddParticipant,
}

#[derive(Debug, Default)]
struct InMemoryState {
    trips: HashMap<TripId, Trip>,
    participants: Vec<Participant>,
    activities: Vec<Activity>,
    links: Vec<Link>,
    failing: HashSet<StoreOperation>,
}

impl InMemoryState {
    fn check(&self, operation: StoreOperation) -> Result<()> {
        if self.failing.contains(&operation) {
            return Err(StoreError::Unavailable(format!(
                "injected failure on {operation:?}"
            )));
        }
        Ok(())
    }

    fn require_trip(&self, trip_id: TripId) -> Result<()> {
        if self.trips.contains_key(&trip_id) {
            Ok(())
        } else {
            Err(StoreError::TripNotFound(trip_id))
        }
    }
}

/// In-memory trip store for development and testing.
///
/// All data lives behind one lock, so every operation (including the
/// multi-row trip creation) is atomic with respect to the others.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTripStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryTripStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures an operation to fail until switched back off.
    pub async fn set_fail_on(&self, operation: StoreOperation, fail: bool) {
        let mut state = self.state.write().await;
        if fail {
            state.failing.insert(operation);
        } else {
            state.failing.remove(&operation);
        }
    }

    /// Returns the total number of stored trips.
    pub async fn trip_count(&self) -> usize {
        self.state.read().await.trips.len()
    }

    /// Returns the total number of stored participants across all trips.
    pub async fn participant_count(&self) -> usize {
        self.state.read().await.participants.len()
    }
}

#[async_trait]
impl TripStore for InMemoryTripStore {
    async fn create_trip_with_participants(
        &self,
        trip: NewTrip,
        participant_emails: Vec<Email>,
    ) -> Result<Trip> {
        let mut state = self.state.write().await;
        state.check(StoreOperation::CreateTrip)?;

        let trip = trip.into_trip(TripId::new());
        state
            .participants
            .extend(participant_emails.into_iter().map(|email| Participant::invited(trip.id, email)));
        state.trips.insert(trip.id, trip.clone());

        Ok(trip)
    }

    async fn get_trip(&self, trip_id: TripId) -> Result<Option<Trip>> {
        let state = self.state.read().await;
        state.check(StoreOperation::GetTrip)?;
        Ok(state.trips.get(&trip_id).cloned())
    }

    async fn update_trip(&self, trip_id: TripId, update: TripUpdate) -> Result<()> {
        let mut state = self.state.write().await;
        state.check(StoreOperation::UpdateTrip)?;

        let trip = state
            .trips
            .get_mut(&trip_id)
            .ok_or(StoreError::TripNotFound(trip_id))?;
        trip.destination = update.destination;
        trip.starts_at = update.starts_at;
        trip.ends_at = update.ends_at;
        Ok(())
    }

    async fn set_trip_confirmed(&self, trip_id: TripId) -> Result<()> {
        let mut state = self.state.write().await;
        state.check(StoreOperation::SetTripConfirmed)?;

        let trip = state
            .trips
            .get_mut(&trip_id)
            .ok_or(StoreError::TripNotFound(trip_id))?;
        trip.is_confirmed = true;
        Ok(())
    }

    async fn get_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Option<Participant>> {
        let state = self.state.read().await;
        state.check(StoreOperation::GetParticipant)?;
        Ok(state
            .participants
            .iter()
            .find(|p| p.id == participant_id)
            .cloned())
    }

    async fn confirm_participant(&self, participant_id: ParticipantId) -> Result<bool> {
        let mut state = self.state.write().await;
        state.check(StoreOperation::ConfirmParticipant)?;

        match state
            .participants
            .iter_mut()
            .find(|p| p.id == participant_id && !p.is_confirmed)
        {
            Some(participant) => {
                participant.is_confirmed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_participants(&self, trip_id: TripId) -> Result<Vec<Participant>> {
        let state = self.state.read().await;
        state.check(StoreOperation::ListParticipants)?;
        Ok(state
            .participants
            .iter()
            .filter(|p| p.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn add_participant(&self, trip_id: TripId, email: Email) -> Result<Participant> {
        let mut state = self.state.write().await;
        state.check(StoreOperation::AddParticipant)?;
        state.require_trip(trip_id)?;

        let participant = Participant::invited(trip_id, email);
        state.participants.push(participant.clone());
        Ok(participant)
    }

    async fn create_activity(&self, trip_id: TripId, activity: NewActivity) -> Result<Activity> {
        let mut state = self.state.write().await;
        state.require_trip(trip_id)?;

        let activity = Activity {
            id: ActivityId::new(),
            trip_id,
            title: activity.title,
            occurs_at: activity.occurs_at,
        };
        state.activities.push(activity.clone());
        Ok(activity)
    }

    async fn list_activities(&self, trip_id: TripId) -> Result<Vec<Activity>> {
        let state = self.state.read().await;
        let mut activities: Vec<_> = state
            .activities
            .iter()
            .filter(|a| a.trip_id == trip_id)
            .cloned()
            .collect();
        activities.sort_by_key(|a| a.occurs_at);
        Ok(activities)
    }

    async fn create_link(&self, trip_id: TripId, link: NewLink) -> Result<Link> {
        let mut state = self.state.write().await;
        state.require_trip(trip_id)?;

        let link = Link {
            id: LinkId::new(),
            trip_id,
            title: link.title,
            url: link.url,
        };
        state.links.push(link.clone());
        Ok(link)
    }

    async fn list_links(&self, trip_id: TripId) -> Result<Vec<Link>> {
        let state = self.state.read().await;
        Ok(state
            .links
            .iter()
            .filter(|l| l.trip_id == trip_id)
            .cloned()
            .collect())
    }
}
