//! HTTP route handlers.

pub mod activities;
pub mod health;
pub mod links;
pub mod metrics;
pub mod participants;
pub mod trips;

use std::str::FromStr;

use planner::TripPlanner;
use trip_store::TripStore;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: TripStore> {
    pub planner: TripPlanner<S>,
    /// Name of the storage backend, reported by the health check.
    pub backend: &'static str,
}

/// Parses an identifier taken from the request path.
pub(crate) fn parse_id<T>(raw: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
