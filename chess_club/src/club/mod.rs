//! Club-site domain: events, membership applications, contact
//! messages, and player profiles.
//!
//! These are the CRUD surfaces the website carries around the bracket
//! core. Each domain is a repository trait with a PostgreSQL
//! implementation and an in-memory implementation for tests.

pub mod memory;
pub mod models;
pub mod repository;

pub use memory::{
    MemoryContactRepository, MemoryEventRepository, MemoryMembershipRepository,
    MemoryPlayerRepository,
};
pub use models::{
    ApplicationStatus, ContactMessage, Event, MembershipApplication, PlayerProfile,
};
pub use repository::{
    ClubError, ClubResult, ContactRepository, EventRepository, MembershipRepository,
    PgContactRepository, PgEventRepository, PgMembershipRepository, PgPlayerRepository,
    PlayerRepository,
};
