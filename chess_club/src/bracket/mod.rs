//! Single-elimination tournament brackets.
//!
//! This module is the one home for bracket logic that the club site
//! needs in several places (admin console, public competition pages,
//! REST controllers): seeding participants into round 1, pairing
//! rounds, advancing winners with bye handling, and detecting the
//! champion.
//!
//! ## Example
//!
//! ```
//! use chess_club::bracket::{BracketEngine, Participant, Tournament};
//!
//! let mut engine = BracketEngine::new();
//! let mut tournament = Tournament::new("Spring Open", "Club championship", 16);
//!
//! engine.register_participant(&mut tournament, Participant::new("Aisha", 1650))?;
//! engine.register_participant(&mut tournament, Participant::new("Boris", 1480))?;
//! engine.start_tournament(&mut tournament)?;
//!
//! let finalist = tournament.rounds[0].matchups[0].player1.clone().unwrap();
//! engine.record_winner(&mut tournament, 0, 0, finalist.id)?;
//! assert!(tournament.winner.is_some());
//! # Ok::<(), chess_club::bracket::BracketError>(())
//! ```

pub mod engine;
pub mod models;

pub use engine::{BracketEngine, BracketError, BracketResult, MIN_PARTICIPANTS};
pub use models::{
    round_name, Matchup, MatchupStatus, Participant, ParticipantId, Round, RoundStatus,
    Tournament, TournamentId, TournamentStatus,
};
