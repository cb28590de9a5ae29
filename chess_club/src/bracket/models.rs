//! Data models for single-elimination tournament brackets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Participant ID type
pub type ParticipantId = Uuid;

/// Tournament ID type
pub type TournamentId = Uuid;

/// A player registered for a tournament.
///
/// Immutable once registered; the display name and rating are supplied
/// by the player-profile layer and are not recomputed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier, unique within a tournament
    pub id: ParticipantId,
    /// Name shown in the rendered bracket
    pub display_name: String,
    /// Club rating at registration time
    pub rating: u32,
    /// Registration timestamp
    pub registered_at: DateTime<Utc>,
}

impl Participant {
    /// Create a participant with a fresh ID, registered now
    pub fn new(display_name: impl Into<String>, rating: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            rating,
            registered_at: Utc::now(),
        }
    }
}

/// Per-matchup status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchupStatus {
    /// Both players seeded, result not yet recorded (round 1)
    Pending,
    /// Both slots filled by advancement, playable
    Ready,
    /// Winner recorded
    Completed,
    /// One or both slots still empty, waiting on earlier results
    Waiting,
}

/// A slot in a round pairing two participants.
///
/// A matchup with `player1` set and `player2` absent is a bye: its sole
/// participant advances as winner without playing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matchup {
    pub player1: Option<Participant>,
    pub player2: Option<Participant>,
    pub winner: Option<Participant>,
    pub status: MatchupStatus,
}

impl Matchup {
    /// Round-1 pairing of two seeded participants
    pub fn pending(player1: Participant, player2: Participant) -> Self {
        Self {
            player1: Some(player1),
            player2: Some(player2),
            winner: None,
            status: MatchupStatus::Pending,
        }
    }

    /// Bye: auto-completed with its sole participant as winner
    pub fn bye(player: Participant) -> Self {
        Self {
            player1: Some(player.clone()),
            player2: None,
            winner: Some(player),
            status: MatchupStatus::Completed,
        }
    }

    /// Later-round placeholder, filled by advancement
    pub fn waiting() -> Self {
        Self {
            player1: None,
            player2: None,
            winner: None,
            status: MatchupStatus::Waiting,
        }
    }

    /// Whether this matchup is a bye
    pub fn is_bye(&self) -> bool {
        self.player1.is_some() && self.player2.is_none() && self.status == MatchupStatus::Completed
    }

    /// Look up one of the two players by ID
    pub fn player(&self, id: ParticipantId) -> Option<&Participant> {
        [self.player1.as_ref(), self.player2.as_ref()]
            .into_iter()
            .flatten()
            .find(|p| p.id == id)
    }
}

/// Round status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundStatus {
    /// Waiting on earlier rounds
    Pending,
    /// Currently playable
    InProgress,
    /// All matchups decided
    Completed,
}

/// An ordered list of matchups played in parallel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round number
    pub number: u32,
    /// Display name ("Round 1", "Quarter-Final", "Semi-Final", "Final")
    pub name: String,
    pub status: RoundStatus,
    /// Number of participants entering this round. Odd counts mean the
    /// final matchup of the round is a bye slot.
    pub entrant_count: usize,
    pub matchups: Vec<Matchup>,
}

impl Round {
    /// Whether every matchup in this round has a recorded winner
    pub fn is_complete(&self) -> bool {
        self.matchups
            .iter()
            .all(|m| m.status == MatchupStatus::Completed)
    }
}

/// Display name for a round entered by `remaining` participants.
pub fn round_name(remaining: usize) -> String {
    match remaining {
        2 => "Final".to_string(),
        4 => "Semi-Final".to_string(),
        8 => "Quarter-Final".to_string(),
        n => format!("Round {n}"),
    }
}

/// Tournament lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentStatus {
    /// Accepting registrations
    Registration,
    /// Bracket generated, rounds being played
    InProgress,
    /// Champion decided
    Completed,
    /// Cancelled before completion (terminal)
    Cancelled,
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Registration => "registration",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{repr}")
    }
}

/// A single-elimination tournament record.
///
/// The engine operates on this value in memory; persistence (including
/// the `revision` used for optimistic concurrency at the store
/// boundary) is the store's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: String,
    /// Registration cap; `participants.len()` never exceeds this
    pub max_participants: usize,
    /// Registered participants in registration order
    pub participants: Vec<Participant>,
    /// Bracket rounds, empty until the tournament starts
    pub rounds: Vec<Round>,
    /// 1-based number of the round currently playable; 0 = not started
    pub current_round: u32,
    pub status: TournamentStatus,
    /// Champion, set when the final matchup is decided
    pub winner: Option<Participant>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub entry_fee: Option<i64>,
    pub prizes: Vec<String>,
    /// Bumped by the store on every successful save
    pub revision: i64,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a tournament open for registration
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        max_participants: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            max_participants,
            participants: Vec::new(),
            rounds: Vec::new(),
            current_round: 0,
            status: TournamentStatus::Registration,
            winner: None,
            start_date: None,
            end_date: None,
            location: None,
            entry_fee: None,
            prizes: Vec::new(),
            revision: 0,
            created_at: Utc::now(),
        }
    }

    /// Look up a registered participant by ID
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_name_named_rounds() {
        assert_eq!(round_name(2), "Final");
        assert_eq!(round_name(4), "Semi-Final");
        assert_eq!(round_name(8), "Quarter-Final");
    }

    #[test]
    fn test_round_name_numeric_rounds() {
        assert_eq!(round_name(16), "Round 16");
        assert_eq!(round_name(3), "Round 3");
        assert_eq!(round_name(11), "Round 11");
    }

    #[test]
    fn test_bye_is_completed_with_holder_as_winner() {
        let player = Participant::new("Magnus", 2100);
        let matchup = Matchup::bye(player.clone());

        assert!(matchup.is_bye());
        assert_eq!(matchup.status, MatchupStatus::Completed);
        assert_eq!(matchup.winner.as_ref().map(|w| w.id), Some(player.id));
        assert!(matchup.player2.is_none());
    }

    #[test]
    fn test_pending_matchup_is_not_a_bye() {
        let matchup = Matchup::pending(Participant::new("A", 1200), Participant::new("B", 1300));
        assert!(!matchup.is_bye());
        assert_eq!(matchup.status, MatchupStatus::Pending);
        assert!(matchup.winner.is_none());
    }

    #[test]
    fn test_matchup_player_lookup() {
        let a = Participant::new("A", 1200);
        let b = Participant::new("B", 1300);
        let matchup = Matchup::pending(a.clone(), b.clone());

        assert_eq!(matchup.player(a.id).map(|p| p.id), Some(a.id));
        assert_eq!(matchup.player(b.id).map(|p| p.id), Some(b.id));
        assert!(matchup.player(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_new_tournament_starts_in_registration() {
        let tournament = Tournament::new("Spring Open", "Club championship", 16);
        assert_eq!(tournament.status, TournamentStatus::Registration);
        assert_eq!(tournament.current_round, 0);
        assert!(tournament.participants.is_empty());
        assert!(tournament.rounds.is_empty());
        assert!(tournament.winner.is_none());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TournamentStatus::Registration.to_string(), "registration");
        assert_eq!(TournamentStatus::InProgress.to_string(), "in-progress");
        assert_eq!(TournamentStatus::Completed.to_string(), "completed");
        assert_eq!(TournamentStatus::Cancelled.to_string(), "cancelled");
    }
}
