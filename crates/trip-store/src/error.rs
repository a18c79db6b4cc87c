use thiserror::Error;

use crate::TripId;

/// Errors that can occur when interacting with the trip store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced trip does not exist.
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),

    /// A stored row could not be mapped back into a model.
    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow { table: &'static str, reason: String },

    /// The store refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for trip store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
