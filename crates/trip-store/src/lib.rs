pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod store;

pub use common::{ActivityId, Email, LinkId, ParticipantId, TripId};
pub use error::{Result, StoreError};
pub use memory::{InMemoryTripStore, StoreOperation};
pub use model::{Activity, Link, NewActivity, NewLink, NewTrip, Participant, Trip, TripUpdate};
pub use postgres::PostgresTripStore;
pub use store::TripStore;
