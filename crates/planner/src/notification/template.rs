//! Email rendering for trip notifications.

use common::Email;

use super::service::{NotificationKind, TripContext};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A rendered plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: Email,
    pub to: Email,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Renders the email for a notification kind.
    pub fn render(kind: NotificationKind, from: &Email, to: &Email, trip: &TripContext) -> Self {
        match kind {
            NotificationKind::TripCreated => Self::trip_created(from, to, trip),
            NotificationKind::Invitation => Self::invitation(from, to, trip),
        }
    }

    /// Email sent to the owner after the trip has been created.
    pub fn trip_created(from: &Email, to: &Email, trip: &TripContext) -> Self {
        Self {
            from: from.clone(),
            to: to.clone(),
            subject: format!("Confirm your trip to {}", trip.destination),
            body: format!(
                "Hello, {}!\n\n\
                 Your trip to {} starting on {} has been created.\n\
                 Confirm the trip to send invitations to everyone on it.\n\n\
                 Trip reference: {}\n",
                trip.owner_name,
                trip.destination,
                trip.starts_at.format(DATE_FORMAT),
                trip.trip_id,
            ),
        }
    }

    /// Email sent to a participant invited to the trip.
    pub fn invitation(from: &Email, to: &Email, trip: &TripContext) -> Self {
        Self {
            from: from.clone(),
            to: to.clone(),
            subject: format!("You're invited to {}", trip.destination),
            body: format!(
                "Hello!\n\n\
                 {} invited you to a trip to {} from {} to {}.\n\
                 Confirm your attendance to join.\n\n\
                 Trip reference: {}\n",
                trip.owner_name,
                trip.destination,
                trip.starts_at.format(DATE_FORMAT),
                trip.ends_at.format(DATE_FORMAT),
                trip.trip_id,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use common::TripId;

    use super::*;

    fn context() -> TripContext {
        TripContext {
            trip_id: TripId::new(),
            destination: "Paris".to_string(),
            owner_name: "Ana".to_string(),
            starts_at: Utc.with_ymd_and_hms(2025, 1, 10, 8, 30, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2025, 1, 15, 20, 0, 0).unwrap(),
        }
    }

    fn email(value: &str) -> Email {
        Email::parse(value).unwrap()
    }

    #[test]
    fn test_trip_created_greets_owner() {
        let trip = context();
        let message =
            EmailMessage::trip_created(&email("noreply@x.com"), &email("a@x.com"), &trip);

        assert_eq!(message.to.as_str(), "a@x.com");
        assert_eq!(message.subject, "Confirm your trip to Paris");
        assert!(message.body.starts_with("Hello, Ana!"));
        assert!(message.body.contains("starting on 2025-01-10"));
        assert!(message.body.contains(&trip.trip_id.to_string()));
    }

    #[test]
    fn test_invitation_names_owner_and_dates() {
        let message = EmailMessage::render(
            NotificationKind::Invitation,
            &email("noreply@x.com"),
            &email("b@x.com"),
            &context(),
        );

        assert_eq!(message.subject, "You're invited to Paris");
        assert!(message.body.contains("Ana invited you"));
        assert!(message.body.contains("from 2025-01-10 to 2025-01-15"));
    }
}
