//! Repository traits for the club-site domain with PostgreSQL
//! implementations.
//!
//! The traits exist so the API layer can be driven against in-memory
//! implementations in tests; see [`super::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::models::{
    ApplicationStatus, ContactMessage, Event, MembershipApplication, PlayerProfile,
};

/// Club-site repository errors
#[derive(Debug, Error)]
pub enum ClubError {
    #[error("not found: {0}")]
    NotFound(Uuid),

    #[error("a pending application already exists for {0}")]
    DuplicateApplication(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type ClubResult<T> = Result<T, ClubError>;

/// Competition/event listings
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> ClubResult<()>;
    async fn get(&self, id: Uuid) -> ClubResult<Event>;
    /// List events, optionally only those starting in the future
    async fn list(&self, upcoming_only: bool) -> ClubResult<Vec<Event>>;
    async fn update(&self, event: &Event) -> ClubResult<()>;
    async fn delete(&self, id: Uuid) -> ClubResult<()>;
}

/// Membership applications
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Submit an application; at most one pending application per email
    async fn submit(&self, application: &MembershipApplication) -> ClubResult<()>;
    async fn list(&self, status: Option<ApplicationStatus>)
        -> ClubResult<Vec<MembershipApplication>>;
    /// Approve or reject a pending application
    async fn review(&self, id: Uuid, approve: bool) -> ClubResult<MembershipApplication>;
}

/// Contact-form messages
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn submit(&self, message: &ContactMessage) -> ClubResult<()>;
    async fn list(&self) -> ClubResult<Vec<ContactMessage>>;
    async fn mark_read(&self, id: Uuid) -> ClubResult<()>;
}

/// Player profiles and the leaderboard
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn upsert(&self, profile: &PlayerProfile) -> ClubResult<()>;
    async fn get(&self, id: Uuid) -> ClubResult<PlayerProfile>;
    /// Top `limit` profiles ordered by rating, highest first
    async fn leaderboard(&self, limit: i64) -> ClubResult<Vec<PlayerProfile>>;
}

// --- PostgreSQL implementations ---

#[derive(Clone)]
pub struct PgEventRepository {
    pool: Arc<PgPool>,
}

impl PgEventRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn row_to_event(row: &PgRow) -> Event {
    Event {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        starts_at: row.get::<DateTime<Utc>, _>("starts_at"),
        location: row.get("location"),
        entry_fee: row.get("entry_fee"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create(&self, event: &Event) -> ClubResult<()> {
        sqlx::query(
            r#"
            INSERT INTO events (id, title, description, starts_at, location, entry_fee, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.starts_at)
        .bind(&event.location)
        .bind(event.entry_fee)
        .bind(event.created_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> ClubResult<Event> {
        let row = sqlx::query(
            "SELECT id, title, description, starts_at, location, entry_fee, created_at \
             FROM events WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(ClubError::NotFound(id))?;
        Ok(row_to_event(&row))
    }

    async fn list(&self, upcoming_only: bool) -> ClubResult<Vec<Event>> {
        let rows = if upcoming_only {
            sqlx::query(
                "SELECT id, title, description, starts_at, location, entry_fee, created_at \
                 FROM events WHERE starts_at > NOW() ORDER BY starts_at",
            )
            .fetch_all(self.pool.as_ref())
            .await?
        } else {
            sqlx::query(
                "SELECT id, title, description, starts_at, location, entry_fee, created_at \
                 FROM events ORDER BY starts_at",
            )
            .fetch_all(self.pool.as_ref())
            .await?
        };
        Ok(rows.iter().map(row_to_event).collect())
    }

    async fn update(&self, event: &Event) -> ClubResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = $2, description = $3, starts_at = $4, location = $5, entry_fee = $6
            WHERE id = $1
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.starts_at)
        .bind(&event.location)
        .bind(event.entry_fee)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(ClubError::NotFound(event.id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ClubResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;
        if result.rows_affected() == 0 {
            return Err(ClubError::NotFound(id));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: Arc<PgPool>,
}

impl PgMembershipRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn application_status_to_str(status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Pending => "pending",
        ApplicationStatus::Approved => "approved",
        ApplicationStatus::Rejected => "rejected",
    }
}

fn application_status_from_str(status: &str) -> ApplicationStatus {
    match status {
        "approved" => ApplicationStatus::Approved,
        "rejected" => ApplicationStatus::Rejected,
        _ => ApplicationStatus::Pending,
    }
}

fn row_to_application(row: &PgRow) -> MembershipApplication {
    let status: String = row.get("status");
    MembershipApplication {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        experience: row.get("experience"),
        message: row.get("message"),
        status: application_status_from_str(&status),
        submitted_at: row.get::<DateTime<Utc>, _>("submitted_at"),
        reviewed_at: row.get::<Option<DateTime<Utc>>, _>("reviewed_at"),
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn submit(&self, application: &MembershipApplication) -> ClubResult<()> {
        let pending = sqlx::query(
            "SELECT id FROM membership_applications WHERE email = $1 AND status = 'pending'",
        )
        .bind(&application.email)
        .fetch_optional(self.pool.as_ref())
        .await?;
        if pending.is_some() {
            return Err(ClubError::DuplicateApplication(application.email.clone()));
        }

        sqlx::query(
            r#"
            INSERT INTO membership_applications
                (id, first_name, last_name, email, experience, message, status, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(application.id)
        .bind(&application.first_name)
        .bind(&application.last_name)
        .bind(&application.email)
        .bind(&application.experience)
        .bind(&application.message)
        .bind(application_status_to_str(application.status))
        .bind(application.submitted_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> ClubResult<Vec<MembershipApplication>> {
        let rows = if let Some(status) = status {
            sqlx::query(
                "SELECT id, first_name, last_name, email, experience, message, status, \
                 submitted_at, reviewed_at FROM membership_applications \
                 WHERE status = $1 ORDER BY submitted_at DESC",
            )
            .bind(application_status_to_str(status))
            .fetch_all(self.pool.as_ref())
            .await?
        } else {
            sqlx::query(
                "SELECT id, first_name, last_name, email, experience, message, status, \
                 submitted_at, reviewed_at FROM membership_applications \
                 ORDER BY submitted_at DESC",
            )
            .fetch_all(self.pool.as_ref())
            .await?
        };
        Ok(rows.iter().map(row_to_application).collect())
    }

    async fn review(&self, id: Uuid, approve: bool) -> ClubResult<MembershipApplication> {
        let status = if approve {
            ApplicationStatus::Approved
        } else {
            ApplicationStatus::Rejected
        };
        let row = sqlx::query(
            r#"
            UPDATE membership_applications
            SET status = $2, reviewed_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, first_name, last_name, email, experience, message, status,
                      submitted_at, reviewed_at
            "#,
        )
        .bind(id)
        .bind(application_status_to_str(status))
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(ClubError::NotFound(id))?;
        Ok(row_to_application(&row))
    }
}

#[derive(Clone)]
pub struct PgContactRepository {
    pool: Arc<PgPool>,
}

impl PgContactRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn submit(&self, message: &ContactMessage) -> ClubResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contact_messages (id, name, email, subject, body, read, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.subject)
        .bind(&message.body)
        .bind(message.read)
        .bind(message.submitted_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn list(&self) -> ClubResult<Vec<ContactMessage>> {
        let rows = sqlx::query(
            "SELECT id, name, email, subject, body, read, submitted_at \
             FROM contact_messages ORDER BY submitted_at DESC",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .iter()
            .map(|row| ContactMessage {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
                subject: row.get("subject"),
                body: row.get("body"),
                read: row.get("read"),
                submitted_at: row.get::<DateTime<Utc>, _>("submitted_at"),
            })
            .collect())
    }

    async fn mark_read(&self, id: Uuid) -> ClubResult<()> {
        let result = sqlx::query("UPDATE contact_messages SET read = TRUE WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;
        if result.rows_affected() == 0 {
            return Err(ClubError::NotFound(id));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgPlayerRepository {
    pool: Arc<PgPool>,
}

impl PgPlayerRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn row_to_profile(row: &PgRow) -> PlayerProfile {
    PlayerProfile {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        rating: row.get::<i32, _>("rating") as u32,
        games_played: row.get::<i32, _>("games_played") as u32,
        joined_at: row.get::<DateTime<Utc>, _>("joined_at"),
    }
}

#[async_trait]
impl PlayerRepository for PgPlayerRepository {
    async fn upsert(&self, profile: &PlayerProfile) -> ClubResult<()> {
        sqlx::query(
            r#"
            INSERT INTO players (id, first_name, last_name, email, rating, games_played, joined_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET first_name = $2, last_name = $3, email = $4, rating = $5, games_played = $6
            "#,
        )
        .bind(profile.id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(profile.rating as i32)
        .bind(profile.games_played as i32)
        .bind(profile.joined_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> ClubResult<PlayerProfile> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, email, rating, games_played, joined_at \
             FROM players WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(ClubError::NotFound(id))?;
        Ok(row_to_profile(&row))
    }

    async fn leaderboard(&self, limit: i64) -> ClubResult<Vec<PlayerProfile>> {
        let rows = sqlx::query(
            "SELECT id, first_name, last_name, email, rating, games_played, joined_at \
             FROM players ORDER BY rating DESC, last_name LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(rows.iter().map(row_to_profile).collect())
    }
}
