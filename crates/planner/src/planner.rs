//! Trip planner orchestrating the trip and participant lifecycle.

use common::{ActivityId, LinkId, ParticipantId, TripId};
use trip_store::{Link, Participant, Trip, TripStore};

use crate::commands::{CreateActivity, CreateLink, CreateTrip, InviteParticipant, UpdateTrip};
use crate::dispatcher::{Notification, NotificationDispatcher};
use crate::error::{PlannerError, Result};
use crate::itinerary::{self, ActivityDay};
use crate::notification::TripContext;
use crate::state::Confirmation;

/// Outcome of a trip confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripConfirmed {
    pub trip_id: TripId,
    /// Whether the trip was already confirmed before this call.
    pub was_confirmed: bool,
    /// Number of invitation tasks dispatched, one per participant.
    pub notifications_dispatched: usize,
}

/// Orchestrates trip state transitions and the notifications they trigger.
///
/// Every operation validates its input, performs its persistence step and
/// only then hands notifications to the dispatcher, which never blocks the
/// caller. The planner holds no locks of its own and relies on the store's
/// atomicity.
pub struct TripPlanner<S: TripStore> {
    store: S,
    dispatcher: NotificationDispatcher,
}

impl<S: TripStore> TripPlanner<S> {
    /// Creates a new planner.
    pub fn new(store: S, dispatcher: NotificationDispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the notification dispatcher.
    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Creates a trip with its owner and invitees as participants.
    ///
    /// All rows are committed together. The owner is then sent one
    /// "trip created" notification in the background.
    #[tracing::instrument(skip(self, cmd), fields(destination = %cmd.destination))]
    pub async fn create_trip(&self, cmd: CreateTrip) -> Result<TripId> {
        let (new_trip, participants) = cmd.validate()?;
        let participant_count = participants.len();

        let trip = self
            .store
            .create_trip_with_participants(new_trip, participants)
            .await?;

        metrics::counter!("trips_created_total").increment(1);
        tracing::info!(trip_id = %trip.id, participants = participant_count, "trip created");

        self.dispatcher.dispatch(Notification::trip_created(
            trip.owner_email.clone(),
            TripContext::from(&trip),
        ));

        Ok(trip.id)
    }

    /// Loads a trip.
    #[tracing::instrument(skip(self))]
    pub async fn get_trip(&self, trip_id: TripId) -> Result<Trip> {
        self.store
            .get_trip(trip_id)
            .await?
            .ok_or(PlannerError::TripNotFound(trip_id))
    }

    /// Changes a trip's destination and dates, keeping its confirmation.
    #[tracing::instrument(skip(self, cmd), fields(trip_id = %cmd.trip_id))]
    pub async fn update_trip(&self, cmd: UpdateTrip) -> Result<()> {
        let (trip_id, update) = cmd.validate()?;
        self.store.update_trip(trip_id, update).await?;
        tracing::info!(%trip_id, "trip updated");
        Ok(())
    }

    /// Confirms a trip and invites every current participant.
    ///
    /// The participant set is read before the flag is written, and no
    /// notification is dispatched unless the write succeeded. Confirming an
    /// already-confirmed trip is accepted and sends the invitations again.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_trip(&self, trip_id: TripId) -> Result<TripConfirmed> {
        let trip = self.get_trip(trip_id).await?;
        let participants = self.store.list_participants(trip_id).await?;

        self.store.set_trip_confirmed(trip_id).await?;

        let was_confirmed = Confirmation::from_flag(trip.is_confirmed).is_terminal();
        if was_confirmed {
            tracing::warn!(%trip_id, "trip was already confirmed, re-sending invitations");
        }
        metrics::counter!("trips_confirmed_total").increment(1);

        let context = TripContext::from(&trip);
        for participant in &participants {
            self.dispatcher.dispatch(Notification::invitation(
                participant.email.clone(),
                context.clone(),
            ));
        }

        tracing::info!(
            %trip_id,
            notifications = participants.len(),
            "trip confirmed"
        );

        Ok(TripConfirmed {
            trip_id,
            was_confirmed,
            notifications_dispatched: participants.len(),
        })
    }

    /// Adds a participant to a trip and sends them an invitation.
    ///
    /// Inviting the same address twice creates two participants.
    #[tracing::instrument(skip(self, cmd), fields(trip_id = %cmd.trip_id))]
    pub async fn invite_participant(&self, cmd: InviteParticipant) -> Result<ParticipantId> {
        let (trip_id, email) = cmd.validate()?;
        let trip = self.get_trip(trip_id).await?;

        let participant = self.store.add_participant(trip_id, email).await?;

        metrics::counter!("participants_invited_total").increment(1);
        tracing::info!(%trip_id, participant_id = %participant.id, "participant invited");

        self.dispatcher.dispatch(Notification::invitation(
            participant.email,
            TripContext::from(&trip),
        ));

        Ok(participant.id)
    }

    /// Confirms a participant's attendance. No notification is sent.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_participant(&self, participant_id: ParticipantId) -> Result<()> {
        let participant = self
            .store
            .get_participant(participant_id)
            .await?
            .ok_or(PlannerError::ParticipantNotFound(participant_id))?;

        if !Confirmation::from_flag(participant.is_confirmed).can_confirm() {
            tracing::warn!(%participant_id, "participant already confirmed");
            return Err(PlannerError::ParticipantAlreadyConfirmed(participant_id));
        }

        // A concurrent confirmation may have won between the read and the write
        if !self.store.confirm_participant(participant_id).await? {
            tracing::warn!(%participant_id, "participant confirmed concurrently");
            return Err(PlannerError::ParticipantAlreadyConfirmed(participant_id));
        }

        metrics::counter!("participants_confirmed_total").increment(1);
        tracing::info!(%participant_id, trip_id = %participant.trip_id, "participant confirmed");
        Ok(())
    }

    /// Lists a trip's participants.
    #[tracing::instrument(skip(self))]
    pub async fn list_participants(&self, trip_id: TripId) -> Result<Vec<Participant>> {
        self.get_trip(trip_id).await?;
        Ok(self.store.list_participants(trip_id).await?)
    }

    /// Schedules an activity on a trip.
    #[tracing::instrument(skip(self, cmd), fields(trip_id = %cmd.trip_id))]
    pub async fn create_activity(&self, cmd: CreateActivity) -> Result<ActivityId> {
        let (trip_id, activity) = cmd.validate()?;
        let activity = self.store.create_activity(trip_id, activity).await?;
        Ok(activity.id)
    }

    /// Lists a trip's activities grouped by day.
    #[tracing::instrument(skip(self))]
    pub async fn list_activities(&self, trip_id: TripId) -> Result<Vec<ActivityDay>> {
        self.get_trip(trip_id).await?;
        let activities = self.store.list_activities(trip_id).await?;
        Ok(itinerary::group_by_day(activities))
    }

    /// Attaches a link to a trip.
    #[tracing::instrument(skip(self, cmd), fields(trip_id = %cmd.trip_id))]
    pub async fn create_link(&self, cmd: CreateLink) -> Result<LinkId> {
        let (trip_id, link) = cmd.validate()?;
        let link = self.store.create_link(trip_id, link).await?;
        Ok(link.id)
    }

    /// Lists a trip's links.
    #[tracing::instrument(skip(self))]
    pub async fn list_links(&self, trip_id: TripId) -> Result<Vec<Link>> {
        self.get_trip(trip_id).await?;
        Ok(self.store.list_links(trip_id).await?)
    }
}
