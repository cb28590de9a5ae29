//! In-memory club repositories for tests and local development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::models::{
    ApplicationStatus, ContactMessage, Event, MembershipApplication, PlayerProfile,
};
use super::repository::{
    ClubError, ClubResult, ContactRepository, EventRepository, MembershipRepository,
    PlayerRepository,
};

#[derive(Default)]
pub struct MemoryEventRepository {
    events: Mutex<HashMap<Uuid, Event>>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn create(&self, event: &Event) -> ClubResult<()> {
        self.events
            .lock()
            .expect("lock poisoned")
            .insert(event.id, event.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> ClubResult<Event> {
        self.events
            .lock()
            .expect("lock poisoned")
            .get(&id)
            .cloned()
            .ok_or(ClubError::NotFound(id))
    }

    async fn list(&self, upcoming_only: bool) -> ClubResult<Vec<Event>> {
        let now = Utc::now();
        let mut listed: Vec<Event> = self
            .events
            .lock()
            .expect("lock poisoned")
            .values()
            .filter(|e| !upcoming_only || e.starts_at > now)
            .cloned()
            .collect();
        listed.sort_by_key(|e| e.starts_at);
        Ok(listed)
    }

    async fn update(&self, event: &Event) -> ClubResult<()> {
        let mut events = self.events.lock().expect("lock poisoned");
        if !events.contains_key(&event.id) {
            return Err(ClubError::NotFound(event.id));
        }
        events.insert(event.id, event.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> ClubResult<()> {
        self.events
            .lock()
            .expect("lock poisoned")
            .remove(&id)
            .map(|_| ())
            .ok_or(ClubError::NotFound(id))
    }
}

#[derive(Default)]
pub struct MemoryMembershipRepository {
    applications: Mutex<HashMap<Uuid, MembershipApplication>>,
}

impl MemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipRepository for MemoryMembershipRepository {
    async fn submit(&self, application: &MembershipApplication) -> ClubResult<()> {
        let mut applications = self.applications.lock().expect("lock poisoned");
        let duplicate = applications
            .values()
            .any(|a| a.email == application.email && a.status == ApplicationStatus::Pending);
        if duplicate {
            return Err(ClubError::DuplicateApplication(application.email.clone()));
        }
        applications.insert(application.id, application.clone());
        Ok(())
    }

    async fn list(
        &self,
        status: Option<ApplicationStatus>,
    ) -> ClubResult<Vec<MembershipApplication>> {
        let mut listed: Vec<MembershipApplication> = self
            .applications
            .lock()
            .expect("lock poisoned")
            .values()
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(listed)
    }

    async fn review(&self, id: Uuid, approve: bool) -> ClubResult<MembershipApplication> {
        let mut applications = self.applications.lock().expect("lock poisoned");
        let application = applications
            .get_mut(&id)
            .filter(|a| a.status == ApplicationStatus::Pending)
            .ok_or(ClubError::NotFound(id))?;
        application.status = if approve {
            ApplicationStatus::Approved
        } else {
            ApplicationStatus::Rejected
        };
        application.reviewed_at = Some(Utc::now());
        Ok(application.clone())
    }
}

#[derive(Default)]
pub struct MemoryContactRepository {
    messages: Mutex<HashMap<Uuid, ContactMessage>>,
}

impl MemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn submit(&self, message: &ContactMessage) -> ClubResult<()> {
        self.messages
            .lock()
            .expect("lock poisoned")
            .insert(message.id, message.clone());
        Ok(())
    }

    async fn list(&self) -> ClubResult<Vec<ContactMessage>> {
        let mut listed: Vec<ContactMessage> = self
            .messages
            .lock()
            .expect("lock poisoned")
            .values()
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(listed)
    }

    async fn mark_read(&self, id: Uuid) -> ClubResult<()> {
        let mut messages = self.messages.lock().expect("lock poisoned");
        let message = messages.get_mut(&id).ok_or(ClubError::NotFound(id))?;
        message.read = true;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPlayerRepository {
    players: Mutex<HashMap<Uuid, PlayerProfile>>,
}

impl MemoryPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: PlayerProfile) -> Self {
        self.players
            .lock()
            .expect("lock poisoned")
            .insert(profile.id, profile);
        self
    }
}

#[async_trait]
impl PlayerRepository for MemoryPlayerRepository {
    async fn upsert(&self, profile: &PlayerProfile) -> ClubResult<()> {
        self.players
            .lock()
            .expect("lock poisoned")
            .insert(profile.id, profile.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> ClubResult<PlayerProfile> {
        self.players
            .lock()
            .expect("lock poisoned")
            .get(&id)
            .cloned()
            .ok_or(ClubError::NotFound(id))
    }

    async fn leaderboard(&self, limit: i64) -> ClubResult<Vec<PlayerProfile>> {
        let mut listed: Vec<PlayerProfile> = self
            .players
            .lock()
            .expect("lock poisoned")
            .values()
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.last_name.cmp(&b.last_name)));
        listed.truncate(limit as usize);
        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_pending_application_rejected() {
        let repo = MemoryMembershipRepository::new();
        let first = MembershipApplication::new("A", "B", "dup@example.com", "none", "");
        repo.submit(&first).await.unwrap();

        let second = MembershipApplication::new("C", "D", "dup@example.com", "none", "");
        let err = repo.submit(&second).await.unwrap_err();
        assert!(matches!(err, ClubError::DuplicateApplication(_)));
    }

    #[tokio::test]
    async fn test_review_approves_once() {
        let repo = MemoryMembershipRepository::new();
        let application = MembershipApplication::new("A", "B", "a@example.com", "none", "");
        repo.submit(&application).await.unwrap();

        let reviewed = repo.review(application.id, true).await.unwrap();
        assert_eq!(reviewed.status, ApplicationStatus::Approved);
        assert!(reviewed.reviewed_at.is_some());

        // Already reviewed, no longer pending.
        let err = repo.review(application.id, false).await.unwrap_err();
        assert!(matches!(err, ClubError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_leaderboard_orders_by_rating() {
        let repo = MemoryPlayerRepository::new()
            .with_profile(PlayerProfile::new("Low", "Rated", "l@example.com", 1100))
            .with_profile(PlayerProfile::new("High", "Rated", "h@example.com", 1900))
            .with_profile(PlayerProfile::new("Mid", "Rated", "m@example.com", 1500));

        let board = repo.leaderboard(2).await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].rating, 1900);
        assert_eq!(board[1].rating, 1500);
    }

    #[tokio::test]
    async fn test_mark_read() {
        let repo = MemoryContactRepository::new();
        let message = ContactMessage::new("N", "n@example.com", "s", "b");
        repo.submit(&message).await.unwrap();
        repo.mark_read(message.id).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert!(listed[0].read);
    }
}
