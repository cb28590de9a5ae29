//! Tournament persistence boundary.
//!
//! The bracket engine is storage-agnostic; everything it needs is a
//! [`TournamentStore`] that can load a tournament and save it back.
//! Concurrent admins are serialized here, not in the engine: `save`
//! carries the revision the caller loaded, and a stale revision fails
//! with [`StoreError::Conflict`] so the caller re-loads and retries.

use async_trait::async_trait;
use thiserror::Error;

use crate::bracket::{Tournament, TournamentId, TournamentStatus};

pub mod memory;
pub mod postgres;

pub use memory::MemoryTournamentStore;
pub use postgres::PgTournamentStore;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("tournament not found: {0}")]
    NotFound(TournamentId),

    #[error("tournament already exists: {0}")]
    AlreadyExists(TournamentId),

    #[error("stale revision {stale} for tournament {id}")]
    Conflict { id: TournamentId, stale: i64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence interface for tournaments.
#[async_trait]
pub trait TournamentStore: Send + Sync {
    /// Persist a newly created tournament
    async fn create(&self, tournament: &Tournament) -> StoreResult<()>;

    /// Load a tournament by ID
    async fn load(&self, id: TournamentId) -> StoreResult<Tournament>;

    /// Save a mutated tournament.
    ///
    /// Fails with [`StoreError::Conflict`] if the stored revision no
    /// longer matches the one the caller loaded; on success the
    /// in-memory revision is bumped to match the store.
    async fn save(&self, tournament: &mut Tournament) -> StoreResult<()>;

    /// List tournaments, optionally filtered by status, newest first
    async fn list(&self, status: Option<TournamentStatus>) -> StoreResult<Vec<Tournament>>;

    /// Delete a tournament
    async fn delete(&self, id: TournamentId) -> StoreResult<()>;
}
