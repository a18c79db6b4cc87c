//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use trip_store::TripStore;

use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: &'static str,
    pub pending_notifications: usize,
}

/// GET /health: liveness plus the storage backend and notification backlog.
pub async fn check<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        storage: state.backend,
        pending_notifications: state.planner.dispatcher().in_flight(),
    })
}
