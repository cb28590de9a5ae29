//! # Chess Club
//!
//! Domain library for a school chess-club website: the
//! single-elimination tournament bracket engine, its persistence
//! boundary, and the club-site plumbing (events, membership
//! applications, contact messages, player profiles).
//!
//! ## Architecture
//!
//! The bracket engine is pure and synchronous. It walks a tournament
//! through four states:
//!
//! - **Registration**: accepting participant entries
//! - **InProgress**: bracket generated, winners being recorded
//! - **Completed**: champion decided
//! - **Cancelled**: terminal, no further mutation
//!
//! Persistence is a trait boundary ([`store::TournamentStore`]) with a
//! PostgreSQL implementation and an in-memory implementation; the
//! store serializes writes with an optimistic revision check, so the
//! engine never worries about concurrent admins.
//!
//! ## Core Modules
//!
//! - [`bracket`]: bracket generation and progression state machine
//! - [`store`]: tournament persistence boundary
//! - [`club`]: events, membership, contact, and player repositories
//! - [`db`]: PostgreSQL connection pooling

/// Bracket generation and progression.
pub mod bracket;
pub use bracket::{BracketEngine, BracketError, Participant, Tournament, TournamentStatus};

/// Club-site domain repositories.
pub mod club;

/// Database connection pooling.
pub mod db;
pub use db::{Database, DatabaseConfig};

/// Tournament persistence boundary.
pub mod store;
pub use store::{MemoryTournamentStore, PgTournamentStore, StoreError, TournamentStore};
