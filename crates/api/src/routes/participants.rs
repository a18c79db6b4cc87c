//! Participant endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{ParticipantId, TripId};
use serde::Serialize;
use trip_store::{Participant, TripStore};

use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ParticipantResponse {
    pub id: String,
    pub trip_id: String,
    pub email: String,
    pub is_confirmed: bool,
}

impl From<Participant> for ParticipantResponse {
    fn from(participant: Participant) -> Self {
        Self {
            id: participant.id.to_string(),
            trip_id: participant.trip_id.to_string(),
            email: participant.email.to_string(),
            is_confirmed: participant.is_confirmed,
        }
    }
}

#[derive(Serialize)]
pub struct ParticipantsResponse {
    pub participants: Vec<ParticipantResponse>,
}

/// GET /trips/:id/participants: list a trip's participants.
#[tracing::instrument(skip(state))]
pub async fn list<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ParticipantsResponse>, ApiError> {
    let trip_id: TripId = parse_id(&id)?;
    let participants = state.planner.list_participants(trip_id).await?;

    Ok(Json(ParticipantsResponse {
        participants: participants.into_iter().map(Into::into).collect(),
    }))
}

/// PATCH /participants/:id/confirm: confirm one participant's attendance.
#[tracing::instrument(skip(state))]
pub async fn confirm<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let participant_id: ParticipantId = parse_id(&id)?;
    state.planner.confirm_participant(participant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
