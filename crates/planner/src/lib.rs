//! Trip lifecycle orchestration.
//!
//! This crate owns the state transitions a trip and its participants go
//! through and the notifications those transitions trigger:
//! 1. Create a trip together with its owner and invitees (atomic)
//! 2. Invite further participants
//! 3. Confirm the trip, inviting every current participant by email
//! 4. Let each participant confirm their own attendance
//!
//! Notifications are dispatched as detached tasks. Their failures are logged
//! and never reach the caller.

pub mod commands;
pub mod dispatcher;
pub mod error;
pub mod itinerary;
pub mod notification;
pub mod planner;
pub mod state;

pub use commands::{
    CreateActivity, CreateLink, CreateTrip, InviteParticipant, MAX_TEXT_LEN, MAX_URL_LEN,
    UpdateTrip,
};
pub use dispatcher::{DEFAULT_MAX_IN_FLIGHT, Notification, NotificationDispatcher};
pub use error::{ErrorKind, PlannerError, ValidationError};
pub use itinerary::ActivityDay;
pub use notification::{
    EmailMessage, InMemoryNotificationService, NotificationError, NotificationKind,
    NotificationService, SentNotification, SmtpMailer, TracingMailer, TripContext,
};
pub use planner::{TripConfirmed, TripPlanner};
pub use state::Confirmation;
