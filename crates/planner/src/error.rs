//! Planner error types.

use chrono::{DateTime, Utc};
use common::{InvalidEmail, ParticipantId, TripId};
use thiserror::Error;
use trip_store::StoreError;

/// Input rejected before any persistence is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is empty or blank.
    #[error("Invalid input: {field} must not be empty")]
    EmptyField { field: &'static str },

    /// A text field is longer than storage allows.
    #[error("Invalid input: {field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// An email address is malformed.
    #[error("Invalid input: {0}")]
    InvalidEmail(#[from] InvalidEmail),

    /// The end of a date range lies before its start.
    #[error("Invalid input: ends_at ({ends_at}) is before starts_at ({starts_at})")]
    InvalidDateRange {
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },

    /// A link URL is not an absolute http(s) URL.
    #[error("Invalid input: url '{url}' {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Caller-facing class of a planner error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

/// Errors that can occur during planner operations.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The request was malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Trip not found.
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),

    /// Participant not found.
    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    /// The participant has already confirmed.
    #[error("Participant already confirmed: {0}")]
    ParticipantAlreadyConfirmed(ParticipantId),

    /// Trip store error.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl PlannerError {
    /// Returns the caller-facing class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlannerError::Validation(_) => ErrorKind::Validation,
            PlannerError::TripNotFound(_) | PlannerError::ParticipantNotFound(_) => {
                ErrorKind::NotFound
            }
            PlannerError::ParticipantAlreadyConfirmed(_) => ErrorKind::Conflict,
            PlannerError::Store(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for PlannerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::TripNotFound(trip_id) => PlannerError::TripNotFound(trip_id),
            other => PlannerError::Store(other),
        }
    }
}

impl From<InvalidEmail> for PlannerError {
    fn from(e: InvalidEmail) -> Self {
        PlannerError::Validation(e.into())
    }
}

/// Convenience type alias for planner results.
pub type Result<T> = std::result::Result<T, PlannerError>;
