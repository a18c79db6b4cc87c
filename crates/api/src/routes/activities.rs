//! Trip activity endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::TripId;
use planner::{ActivityDay, CreateActivity};
use serde::{Deserialize, Serialize};
use trip_store::TripStore;

use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreateActivityRequest {
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ActivityCreatedResponse {
    pub activity_id: String,
}

#[derive(Serialize)]
pub struct ActivityResponse {
    pub id: String,
    pub title: String,
    pub occurs_at: String,
}

#[derive(Serialize)]
pub struct DayResponse {
    pub date: String,
    pub activities: Vec<ActivityResponse>,
}

impl From<ActivityDay> for DayResponse {
    fn from(day: ActivityDay) -> Self {
        Self {
            date: day.date.to_string(),
            activities: day
                .activities
                .into_iter()
                .map(|a| ActivityResponse {
                    id: a.id.to_string(),
                    title: a.title,
                    occurs_at: a.occurs_at.to_rfc3339(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<DayResponse>,
}

/// POST /trips/:id/activities: schedule an activity.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<CreateActivityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ActivityCreatedResponse>), ApiError> {
    let trip_id: TripId = parse_id(&id)?;
    let Json(req) = payload?;

    let activity_id = state
        .planner
        .create_activity(CreateActivity::new(trip_id, req.title, req.occurs_at))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ActivityCreatedResponse {
            activity_id: activity_id.to_string(),
        }),
    ))
}

/// GET /trips/:id/activities: list activities grouped by day.
#[tracing::instrument(skip(state))]
pub async fn list<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ActivitiesResponse>, ApiError> {
    let trip_id: TripId = parse_id(&id)?;
    let days = state.planner.list_activities(trip_id).await?;

    Ok(Json(ActivitiesResponse {
        activities: days.into_iter().map(Into::into).collect(),
    }))
}
