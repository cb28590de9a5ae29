//! In-memory tournament store for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{StoreError, StoreResult, TournamentStore};
use crate::bracket::{Tournament, TournamentId, TournamentStatus};

/// Mutex-guarded map implementation of [`TournamentStore`].
///
/// Applies the same revision semantics as the PostgreSQL store so the
/// API layer behaves identically under test.
#[derive(Default)]
pub struct MemoryTournamentStore {
    tournaments: Mutex<HashMap<TournamentId, Tournament>>,
}

impl MemoryTournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a tournament, bypassing revision checks
    pub fn with_tournament(self, tournament: Tournament) -> Self {
        self.tournaments
            .lock()
            .expect("store lock poisoned")
            .insert(tournament.id, tournament);
        self
    }
}

#[async_trait]
impl TournamentStore for MemoryTournamentStore {
    async fn create(&self, tournament: &Tournament) -> StoreResult<()> {
        let mut tournaments = self.tournaments.lock().expect("store lock poisoned");
        if tournaments.contains_key(&tournament.id) {
            return Err(StoreError::AlreadyExists(tournament.id));
        }
        tournaments.insert(tournament.id, tournament.clone());
        Ok(())
    }

    async fn load(&self, id: TournamentId) -> StoreResult<Tournament> {
        self.tournaments
            .lock()
            .expect("store lock poisoned")
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn save(&self, tournament: &mut Tournament) -> StoreResult<()> {
        let mut tournaments = self.tournaments.lock().expect("store lock poisoned");
        let stored = tournaments
            .get(&tournament.id)
            .ok_or(StoreError::NotFound(tournament.id))?;
        if stored.revision != tournament.revision {
            return Err(StoreError::Conflict {
                id: tournament.id,
                stale: tournament.revision,
            });
        }
        tournament.revision += 1;
        tournaments.insert(tournament.id, tournament.clone());
        Ok(())
    }

    async fn list(&self, status: Option<TournamentStatus>) -> StoreResult<Vec<Tournament>> {
        let tournaments = self.tournaments.lock().expect("store lock poisoned");
        let mut listed: Vec<Tournament> = tournaments
            .values()
            .filter(|t| status.is_none_or(|s| t.status == s))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn delete(&self, id: TournamentId) -> StoreResult<()> {
        self.tournaments
            .lock()
            .expect("store lock poisoned")
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }
}
