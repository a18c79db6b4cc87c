//! Planner commands and their validation.
//!
//! Commands carry raw caller input. `validate` turns them into the typed
//! store inputs or rejects them before anything is persisted.

use chrono::{DateTime, Utc};
use common::{Email, TripId};
use trip_store::{NewActivity, NewLink, NewTrip, TripUpdate};
use url::Url;

use crate::error::ValidationError;

/// Longest destination, owner name or title a trip row can hold.
pub const MAX_TEXT_LEN: usize = 255;

/// Longest link URL a trip row can hold.
pub const MAX_URL_LEN: usize = 2048;

fn require_max(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    // Column widths count characters, not bytes
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn require_text(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    require_max(field, trimmed, MAX_TEXT_LEN)?;
    Ok(trimmed.to_string())
}

fn require_range(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if ends_at < starts_at {
        return Err(ValidationError::InvalidDateRange { starts_at, ends_at });
    }
    Ok(())
}

/// Command to create a trip with its owner and initial invitees.
#[derive(Debug, Clone)]
pub struct CreateTrip {
    pub destination: String,
    pub owner_name: String,
    pub owner_email: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub emails_to_invite: Vec<String>,
}

impl CreateTrip {
    /// Creates a new CreateTrip command without invitees.
    pub fn new(
        destination: impl Into<String>,
        owner_name: impl Into<String>,
        owner_email: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Self {
        Self {
            destination: destination.into(),
            owner_name: owner_name.into(),
            owner_email: owner_email.into(),
            starts_at,
            ends_at,
            emails_to_invite: Vec::new(),
        }
    }

    /// Adds invitees to the command.
    pub fn inviting<I, E>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        self.emails_to_invite
            .extend(emails.into_iter().map(Into::into));
        self
    }

    /// Validates the command.
    ///
    /// Returns the trip row to store and the participant emails, owner
    /// first, followed by the invitees in the order given.
    pub fn validate(self) -> Result<(NewTrip, Vec<Email>), ValidationError> {
        let destination = require_text("destination", self.destination)?;
        let owner_name = require_text("owner_name", self.owner_name)?;
        let owner_email = Email::parse(&self.owner_email)?;
        require_range(self.starts_at, self.ends_at)?;

        let mut participants = Vec::with_capacity(self.emails_to_invite.len() + 1);
        participants.push(owner_email.clone());
        for email in &self.emails_to_invite {
            participants.push(Email::parse(email)?);
        }

        let trip = NewTrip {
            destination,
            owner_name,
            owner_email,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        };
        Ok((trip, participants))
    }
}

/// Command to change a trip's destination and dates.
#[derive(Debug, Clone)]
pub struct UpdateTrip {
    pub trip_id: TripId,
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl UpdateTrip {
    /// Creates a new UpdateTrip command.
    pub fn new(
        trip_id: TripId,
        destination: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Self {
        Self {
            trip_id,
            destination: destination.into(),
            starts_at,
            ends_at,
        }
    }

    /// Validates the command.
    pub fn validate(self) -> Result<(TripId, TripUpdate), ValidationError> {
        let destination = require_text("destination", self.destination)?;
        require_range(self.starts_at, self.ends_at)?;
        Ok((
            self.trip_id,
            TripUpdate {
                destination,
                starts_at: self.starts_at,
                ends_at: self.ends_at,
            },
        ))
    }
}

/// Command to invite one more participant to a trip.
#[derive(Debug, Clone)]
pub struct InviteParticipant {
    pub trip_id: TripId,
    pub email: String,
}

impl InviteParticipant {
    /// Creates a new InviteParticipant command.
    pub fn new(trip_id: TripId, email: impl Into<String>) -> Self {
        Self {
            trip_id,
            email: email.into(),
        }
    }

    /// Validates the command.
    pub fn validate(self) -> Result<(TripId, Email), ValidationError> {
        Ok((self.trip_id, Email::parse(&self.email)?))
    }
}

/// Command to schedule an activity on a trip.
#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub trip_id: TripId,
    pub title: String,
    pub occurs_at: DateTime<Utc>,
}

impl CreateActivity {
    /// Creates a new CreateActivity command.
    pub fn new(trip_id: TripId, title: impl Into<String>, occurs_at: DateTime<Utc>) -> Self {
        Self {
            trip_id,
            title: title.into(),
            occurs_at,
        }
    }

    /// Validates the command.
    pub fn validate(self) -> Result<(TripId, NewActivity), ValidationError> {
        let title = require_text("title", self.title)?;
        Ok((
            self.trip_id,
            NewActivity {
                title,
                occurs_at: self.occurs_at,
            },
        ))
    }
}

/// Command to attach a shareable link to a trip.
#[derive(Debug, Clone)]
pub struct CreateLink {
    pub trip_id: TripId,
    pub title: String,
    pub url: String,
}

impl CreateLink {
    /// Creates a new CreateLink command.
    pub fn new(trip_id: TripId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            trip_id,
            title: title.into(),
            url: url.into(),
        }
    }

    /// Validates the command. Only absolute `http`/`https` URLs are accepted.
    pub fn validate(self) -> Result<(TripId, NewLink), ValidationError> {
        let title = require_text("title", self.title)?;
        let raw = self.url.trim();
        let url = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl {
                url: raw.to_string(),
                reason: format!("has unsupported scheme '{}'", url.scheme()),
            });
        }

        let url = url.to_string();
        require_max("url", &url, MAX_URL_LEN)?;

        Ok((self.trip_id, NewLink { title, url }))
    }
}
