use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Activity, ActivityId, Email, Link, LinkId, NewActivity, NewLink, NewTrip, Participant,
    ParticipantId, Result, StoreError, Trip, TripId, TripUpdate,
    store::TripStore,
};

/// PostgreSQL-backed trip store implementation.
#[derive(Clone)]
pub struct PostgresTripStore {
    pool: PgPool,
}

impl PostgresTripStore {
    /// Creates a new PostgreSQL trip store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn parse_email(table: &'static str, value: String) -> Result<Email> {
        Email::parse(value).map_err(|e| StoreError::CorruptRow {
            table,
            reason: e.to_string(),
        })
    }

    fn row_to_trip(row: PgRow) -> Result<Trip> {
        Ok(Trip {
            id: TripId::from_uuid(row.try_get::<Uuid, _>("id")?),
            destination: row.try_get("destination")?,
            owner_name: row.try_get("owner_name")?,
            owner_email: Self::parse_email("trips", row.try_get("owner_email")?)?,
            starts_at: row.try_get("starts_at")?,
            ends_at: row.try_get("ends_at")?,
            is_confirmed: row.try_get("is_confirmed")?,
        })
    }

    fn row_to_participant(row: PgRow) -> Result<Participant> {
        Ok(Participant {
            id: ParticipantId::from_uuid(row.try_get::<Uuid, _>("id")?),
            trip_id: TripId::from_uuid(row.try_get::<Uuid, _>("trip_id")?),
            email: Self::parse_email("participants", row.try_get("email")?)?,
            is_confirmed: row.try_get("is_confirmed")?,
        })
    }

    fn row_to_activity(row: PgRow) -> Result<Activity> {
        Ok(Activity {
            id: ActivityId::from_uuid(row.try_get::<Uuid, _>("id")?),
            trip_id: TripId::from_uuid(row.try_get::<Uuid, _>("trip_id")?),
            title: row.try_get("title")?,
            occurs_at: row.try_get("occurs_at")?,
        })
    }

    fn row_to_link(row: PgRow) -> Result<Link> {
        Ok(Link {
            id: LinkId::from_uuid(row.try_get::<Uuid, _>("id")?),
            trip_id: TripId::from_uuid(row.try_get::<Uuid, _>("trip_id")?),
            title: row.try_get("title")?,
            url: row.try_get("url")?,
        })
    }
}

/// Maps a foreign-key violation on `trip_id` to `TripNotFound`.
fn missing_trip(trip_id: TripId) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_foreign_key_violation()
        {
            return StoreError::TripNotFound(trip_id);
        }
        StoreError::Database(e)
    }
}

#[async_trait]
impl TripStore for PostgresTripStore {
    async fn create_trip_with_participants(
        &self,
        trip: NewTrip,
        participant_emails: Vec<Email>,
    ) -> Result<Trip> {
        let trip = trip.into_trip(TripId::new());

        // Dropping the transaction on an early return rolls it back
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO trips (id, destination, owner_name, owner_email, starts_at, ends_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(trip.id.as_uuid())
        .bind(&trip.destination)
        .bind(&trip.owner_name)
        .bind(trip.owner_email.as_str())
        .bind(trip.starts_at)
        .bind(trip.ends_at)
        .execute(&mut *tx)
        .await?;

        for email in &participant_emails {
            sqlx::query("INSERT INTO participants (id, trip_id, email) VALUES ($1, $2, $3)")
                .bind(ParticipantId::new().as_uuid())
                .bind(trip.id.as_uuid())
                .bind(email.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!(
            trip_id = %trip.id,
            participants = participant_emails.len(),
            "trip committed"
        );

        Ok(trip)
    }

    async fn get_trip(&self, trip_id: TripId) -> Result<Option<Trip>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, destination, owner_name, owner_email, starts_at, ends_at, is_confirmed
            FROM trips
            WHERE id = $1
            "#,
        )
        .bind(trip_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_trip).transpose()
    }

    async fn update_trip(&self, trip_id: TripId, update: TripUpdate) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE trips
            SET destination = $2, starts_at = $3, ends_at = $4
            WHERE id = $1
            "#,
        )
        .bind(trip_id.as_uuid())
        .bind(&update.destination)
        .bind(update.starts_at)
        .bind(update.ends_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::TripNotFound(trip_id));
        }
        Ok(())
    }

    async fn set_trip_confirmed(&self, trip_id: TripId) -> Result<()> {
        let result = sqlx::query("UPDATE trips SET is_confirmed = TRUE WHERE id = $1")
            .bind(trip_id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::TripNotFound(trip_id));
        }
        Ok(())
    }

    async fn get_participant(
        &self,
        participant_id: ParticipantId,
    ) -> Result<Option<Participant>> {
        let row: Option<PgRow> = sqlx::query(
            "SELECT id, trip_id, email, is_confirmed FROM participants WHERE id = $1",
        )
        .bind(participant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_participant).transpose()
    }

    async fn confirm_participant(&self, participant_id: ParticipantId) -> Result<bool> {
        // Only an unconfirmed row flips
        let result = sqlx::query(
            "UPDATE participants SET is_confirmed = TRUE WHERE id = $1 AND is_confirmed = FALSE",
        )
        .bind(participant_id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_participants(&self, trip_id: TripId) -> Result<Vec<Participant>> {
        let rows = sqlx::query(
            r#"
            SELECT id, trip_id, email, is_confirmed
            FROM participants
            WHERE trip_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(trip_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_participant).collect()
    }

    async fn add_participant(&self, trip_id: TripId, email: Email) -> Result<Participant> {
        let participant = Participant::invited(trip_id, email);

        sqlx::query("INSERT INTO participants (id, trip_id, email) VALUES ($1, $2, $3)")
            .bind(participant.id.as_uuid())
            .bind(trip_id.as_uuid())
            .bind(participant.email.as_str())
            .execute(&self.pool)
            .await
            .map_err(missing_trip(trip_id))?;

        Ok(participant)
    }

    async fn create_activity(&self, trip_id: TripId, activity: NewActivity) -> Result<Activity> {
        let activity = Activity {
            id: ActivityId::new(),
            trip_id,
            title: activity.title,
            occurs_at: activity.occurs_at,
        };

        sqlx::query(
            "INSERT INTO activities (id, trip_id, title, occurs_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(activity.id.as_uuid())
        .bind(trip_id.as_uuid())
        .bind(&activity.title)
        .bind(activity.occurs_at)
        .execute(&self.pool)
        .await
        .map_err(missing_trip(trip_id))?;

        Ok(activity)
    }

    async fn list_activities(&self, trip_id: TripId) -> Result<Vec<Activity>> {
        let rows = sqlx::query(
            r#"
            SELECT id, trip_id, title, occurs_at
            FROM activities
            WHERE trip_id = $1
            ORDER BY occurs_at ASC
            "#,
        )
        .bind(trip_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_activity).collect()
    }

    async fn create_link(&self, trip_id: TripId, link: NewLink) -> Result<Link> {
        let link = Link {
            id: LinkId::new(),
            trip_id,
            title: link.title,
            url: link.url,
        };

        sqlx::query("INSERT INTO links (id, trip_id, title, url) VALUES ($1, $2, $3, $4)")
            .bind(link.id.as_uuid())
            .bind(trip_id.as_uuid())
            .bind(&link.title)
            .bind(&link.url)
            .execute(&self.pool)
            .await
            .map_err(missing_trip(trip_id))?;

        Ok(link)
    }

    async fn list_links(&self, trip_id: TripId) -> Result<Vec<Link>> {
        let rows = sqlx::query(
            r#"
            SELECT id, trip_id, title, url
            FROM links
            WHERE trip_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(trip_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_link).collect()
    }
}
