//! Data models for the club-site plumbing: events, membership
//! applications, contact messages, and player profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A competition or club event shown on the listing pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub location: Option<String>,
    pub entry_fee: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        starts_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            starts_at,
            location: None,
            entry_fee: None,
            created_at: Utc::now(),
        }
    }
}

/// Membership application review status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

/// A membership application submitted through the site form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipApplication {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Free-form self-reported playing experience
    pub experience: String,
    pub message: String,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl MembershipApplication {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        experience: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            experience: experience.into(),
            message: message.into(),
            status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
        }
    }
}

/// A message submitted through the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub read: bool,
    pub submitted_at: DateTime<Utc>,
}

impl ContactMessage {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            body: body.into(),
            read: false,
            submitted_at: Utc::now(),
        }
    }
}

/// A club member's profile, the source of leaderboard entries and of
/// tournament participants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub rating: u32,
    pub games_played: u32,
    pub joined_at: DateTime<Utc>,
}

impl PlayerProfile {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        rating: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            rating,
            games_played: 0,
            joined_at: Utc::now(),
        }
    }

    /// Display name as rendered in brackets and the leaderboard
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
