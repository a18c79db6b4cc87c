//! Shared types for the trip planner workspace.

pub mod email;
pub mod types;

pub use email::{Email, InvalidEmail};
pub use types::{ActivityId, LinkId, ParticipantId, TripId};
