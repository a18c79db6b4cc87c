//! Trip lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::TripId;
use planner::{CreateTrip, InviteParticipant, UpdateTrip};
use serde::{Deserialize, Serialize};
use trip_store::{Trip, TripStore};

use super::{AppState, parse_id};
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateTripRequest {
    pub destination: String,
    pub owner_name: String,
    pub owner_email: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub emails_to_invite: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateTripRequest {
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct InviteRequest {
    pub email: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct TripCreatedResponse {
    pub trip_id: String,
}

#[derive(Serialize)]
pub struct TripResponse {
    pub id: String,
    pub destination: String,
    pub owner_name: String,
    pub owner_email: String,
    pub starts_at: String,
    pub ends_at: String,
    pub is_confirmed: bool,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id.to_string(),
            destination: trip.destination,
            owner_name: trip.owner_name,
            owner_email: trip.owner_email.to_string(),
            starts_at: trip.starts_at.to_rfc3339(),
            ends_at: trip.ends_at.to_rfc3339(),
            is_confirmed: trip.is_confirmed,
        }
    }
}

#[derive(Serialize)]
pub struct TripEnvelope {
    pub trip: TripResponse,
}

#[derive(Serialize)]
pub struct InvitedResponse {
    pub participant_id: String,
}

// -- Handlers --

/// POST /trips: create a trip with its owner and invitees.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateTripRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TripCreatedResponse>), ApiError> {
    let Json(req) = payload?;

    let cmd = CreateTrip::new(
        req.destination,
        req.owner_name,
        req.owner_email,
        req.starts_at,
        req.ends_at,
    )
    .inviting(req.emails_to_invite);
    let trip_id = state.planner.create_trip(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(TripCreatedResponse {
            trip_id: trip_id.to_string(),
        }),
    ))
}

/// GET /trips/:id: load a trip.
#[tracing::instrument(skip(state))]
pub async fn get<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<TripEnvelope>, ApiError> {
    let trip_id: TripId = parse_id(&id)?;
    let trip = state.planner.get_trip(trip_id).await?;
    Ok(Json(TripEnvelope { trip: trip.into() }))
}

/// PUT /trips/:id: change destination and dates.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTripRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let trip_id: TripId = parse_id(&id)?;
    let Json(req) = payload?;

    state
        .planner
        .update_trip(UpdateTrip::new(
            trip_id,
            req.destination,
            req.starts_at,
            req.ends_at,
        ))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /trips/:id/confirm: confirm the trip and invite every participant.
#[tracing::instrument(skip(state))]
pub async fn confirm<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let trip_id: TripId = parse_id(&id)?;
    state.planner.confirm_trip(trip_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /trips/:id/invites: invite one more participant.
#[tracing::instrument(skip(state, payload))]
pub async fn invite<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<InviteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InvitedResponse>), ApiError> {
    let trip_id: TripId = parse_id(&id)?;
    let Json(req) = payload?;

    let participant_id = state
        .planner
        .invite_participant(InviteParticipant::new(trip_id, req.email))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InvitedResponse {
            participant_id: participant_id.to_string(),
        }),
    ))
}
