//! Single-elimination bracket generation and progression.
//!
//! The engine is pure and synchronous: every operation takes a
//! [`Tournament`] value, validates its preconditions up front, and
//! either mutates it atomically or returns a typed error with nothing
//! committed. Persistence and concurrency control live behind the
//! store boundary, not here.
//!
//! Seeding uses an injected random number generator so tests can drive
//! the shuffle with a seeded PRNG while production uses the thread
//! RNG.

use log::debug;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use super::models::{
    round_name, Matchup, MatchupStatus, Participant, ParticipantId, Round, RoundStatus,
    Tournament, TournamentStatus,
};

/// Minimum entrants required to generate a bracket
pub const MIN_PARTICIPANTS: usize = 2;

/// Bracket engine errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    #[error("need at least {needed} participants, have {current}")]
    InsufficientParticipants { needed: usize, current: usize },

    #[error("tournament is full")]
    TournamentFull,

    #[error("participant already registered")]
    AlreadyRegistered,

    #[error("no matchup at round {round}, slot {matchup}")]
    InvalidMatchup { round: usize, matchup: usize },

    #[error("winner is not a player in this matchup")]
    InvalidWinner,

    #[error("invalid state transition: {detail}")]
    InvalidStateTransition { detail: String },
}

pub type BracketResult<T> = Result<T, BracketError>;

/// Bracket engine over an injectable RNG.
///
/// The RNG is only consumed for round-1 seeding; progression is fully
/// deterministic.
pub struct BracketEngine<R: Rng = ThreadRng> {
    rng: R,
}

impl BracketEngine {
    /// Create an engine seeded from the thread RNG
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for BracketEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> BracketEngine<R> {
    /// Create an engine with an explicit RNG (seeded PRNG in tests)
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generate the full bracket for `participants`.
    ///
    /// Round 1 pairs a fair random permutation of the participants two
    /// at a time; an odd entrant count leaves the last participant in
    /// a bye, auto-completed in their favor. Later rounds are created
    /// as empty `waiting` matchups to be filled by advancement. Every
    /// round with an odd entrant count carries a trailing bye slot so
    /// no advancing player is ever dropped.
    pub fn generate_bracket(
        &mut self,
        participants: &[Participant],
    ) -> BracketResult<Vec<Round>> {
        if participants.len() < MIN_PARTICIPANTS {
            return Err(BracketError::InsufficientParticipants {
                needed: MIN_PARTICIPANTS,
                current: participants.len(),
            });
        }

        let entrants = participants.len();
        let mut seeded = participants.to_vec();
        seeded.shuffle(&mut self.rng);

        let mut matchups = Vec::with_capacity(entrants.div_ceil(2));
        let mut pairs = seeded.into_iter();
        while let Some(player1) = pairs.next() {
            match pairs.next() {
                Some(player2) => matchups.push(Matchup::pending(player1, player2)),
                None => matchups.push(Matchup::bye(player1)),
            }
        }

        let mut rounds = vec![Round {
            number: 1,
            name: "Round 1".to_string(),
            status: RoundStatus::InProgress,
            entrant_count: entrants,
            matchups,
        }];

        // Each round produces ceil(entrants / 2) winners.
        let mut remaining = entrants.div_ceil(2);
        let mut number = 2;
        while remaining > 1 {
            rounds.push(Round {
                number,
                name: round_name(remaining),
                status: RoundStatus::Pending,
                entrant_count: remaining,
                matchups: (0..remaining.div_ceil(2)).map(|_| Matchup::waiting()).collect(),
            });
            remaining = remaining.div_ceil(2);
            number += 1;
        }

        // A 2-entrant bracket has a single round, which is the final.
        if rounds.len() == 1 {
            rounds[0].name = round_name(entrants);
        }

        // A round-1 bye holder is already a winner; seed them forward.
        if let Some(holder) = rounds[0]
            .matchups
            .iter()
            .find(|m| m.is_bye())
            .and_then(|m| m.winner.clone())
        {
            if rounds.len() > 1 {
                place_winner(&mut rounds[1], holder);
            }
        }

        debug!(
            "generated bracket: {} entrants, {} rounds",
            entrants,
            rounds.len()
        );
        Ok(rounds)
    }

    /// Register a participant while the tournament accepts entries.
    pub fn register_participant(
        &self,
        tournament: &mut Tournament,
        participant: Participant,
    ) -> BracketResult<()> {
        require_status(tournament, TournamentStatus::Registration)?;
        if tournament.participants.len() >= tournament.max_participants {
            return Err(BracketError::TournamentFull);
        }
        if tournament.participant(participant.id).is_some() {
            return Err(BracketError::AlreadyRegistered);
        }
        tournament.participants.push(participant);
        Ok(())
    }

    /// Withdraw a participant. Withdrawing an unknown ID is a no-op,
    /// but the tournament must still be in registration.
    pub fn withdraw_participant(
        &self,
        tournament: &mut Tournament,
        participant_id: ParticipantId,
    ) -> BracketResult<()> {
        require_status(tournament, TournamentStatus::Registration)?;
        tournament.participants.retain(|p| p.id != participant_id);
        Ok(())
    }

    /// Generate the bracket and open round 1 for play.
    pub fn start_tournament(&mut self, tournament: &mut Tournament) -> BracketResult<()> {
        require_status(tournament, TournamentStatus::Registration)?;
        let rounds = self.generate_bracket(&tournament.participants)?;
        tournament.rounds = rounds;
        tournament.status = TournamentStatus::InProgress;
        tournament.current_round = 1;
        if tournament.start_date.is_none() {
            tournament.start_date = Some(chrono::Utc::now());
        }
        Ok(())
    }

    /// Record the winner of one matchup and advance them.
    ///
    /// The matchup must be fully seeded (`pending` or `ready`); a
    /// half-seeded `waiting` matchup cannot be decided. The winner
    /// moves into the next round's first open slot (player1 before
    /// player2, matchups in order); a matchup whose both slots are now
    /// filled becomes `ready`. Filling the trailing bye slot of an
    /// odd-entrant round completes it immediately and cascades the
    /// holder forward. Recording the final matchup's winner completes
    /// the tournament instead.
    pub fn record_winner(
        &self,
        tournament: &mut Tournament,
        round_index: usize,
        matchup_index: usize,
        winner_id: ParticipantId,
    ) -> BracketResult<()> {
        require_status(tournament, TournamentStatus::InProgress)?;

        let matchup = tournament
            .rounds
            .get(round_index)
            .and_then(|r| r.matchups.get(matchup_index))
            .ok_or(BracketError::InvalidMatchup {
                round: round_index,
                matchup: matchup_index,
            })?;
        match matchup.status {
            MatchupStatus::Completed => {
                return Err(BracketError::InvalidStateTransition {
                    detail: format!(
                        "matchup {matchup_index} in round {} already has a winner",
                        round_index + 1
                    ),
                });
            }
            MatchupStatus::Waiting => {
                return Err(BracketError::InvalidStateTransition {
                    detail: format!(
                        "matchup {matchup_index} in round {} is not fully seeded",
                        round_index + 1
                    ),
                });
            }
            MatchupStatus::Pending | MatchupStatus::Ready => {}
        }
        let winner = matchup
            .player(winner_id)
            .cloned()
            .ok_or(BracketError::InvalidWinner)?;

        // Preconditions hold; everything from here on commits.
        let slot = &mut tournament.rounds[round_index].matchups[matchup_index];
        slot.winner = Some(winner.clone());
        slot.status = MatchupStatus::Completed;

        advance_winner(tournament, round_index, winner)
    }

    /// Cancel a tournament that has not yet completed. Terminal.
    pub fn cancel_tournament(&self, tournament: &mut Tournament) -> BracketResult<()> {
        match tournament.status {
            TournamentStatus::Registration | TournamentStatus::InProgress => {
                tournament.status = TournamentStatus::Cancelled;
                tournament.end_date = Some(chrono::Utc::now());
                Ok(())
            }
            status => Err(BracketError::InvalidStateTransition {
                detail: format!("cannot cancel a {status} tournament"),
            }),
        }
    }
}

fn require_status(tournament: &Tournament, expected: TournamentStatus) -> BracketResult<()> {
    if tournament.status != expected {
        return Err(BracketError::InvalidStateTransition {
            detail: format!(
                "tournament is {}, operation requires {expected}",
                tournament.status
            ),
        });
    }
    Ok(())
}

/// Place a winner into the round's first open slot, player1 before
/// player2, then flip any fully-seeded matchup to `ready`. Returns the
/// index of the matchup that received the winner.
fn place_winner(round: &mut Round, winner: Participant) -> Option<usize> {
    let mut placed = None;
    for (i, matchup) in round.matchups.iter_mut().enumerate() {
        if matchup.player1.is_none() {
            matchup.player1 = Some(winner);
            placed = Some(i);
            break;
        }
        if matchup.player2.is_none() && matchup.status == MatchupStatus::Waiting {
            matchup.player2 = Some(winner);
            placed = Some(i);
            break;
        }
    }
    for matchup in &mut round.matchups {
        if matchup.status == MatchupStatus::Waiting
            && matchup.player1.is_some()
            && matchup.player2.is_some()
        {
            matchup.status = MatchupStatus::Ready;
        }
    }
    placed
}

/// Move a decided winner out of `from_round`: either into the next
/// round, or onto the tournament as champion when `from_round` was the
/// final. Bye slots cascade recursively.
///
/// A round holds exactly one slot per expected arrival, so a winner
/// that finds no open slot means the bracket is corrupt; that is an
/// error, never a silent drop.
fn advance_winner(
    tournament: &mut Tournament,
    from_round: usize,
    winner: Participant,
) -> BracketResult<()> {
    let next = from_round + 1;
    if next >= tournament.rounds.len() {
        tournament.rounds[from_round].status = RoundStatus::Completed;
        tournament.winner = Some(winner);
        tournament.status = TournamentStatus::Completed;
        tournament.end_date = Some(chrono::Utc::now());
        return Ok(());
    }

    let placed = place_winner(&mut tournament.rounds[next], winner.clone()).ok_or_else(|| {
        BracketError::InvalidStateTransition {
            detail: format!("round {} has no open slot for an advancing winner", next + 1),
        }
    })?;

    if tournament.rounds[from_round].is_complete() {
        tournament.rounds[from_round].status = RoundStatus::Completed;
        tournament.rounds[next].status = RoundStatus::InProgress;
        tournament.current_round = tournament.rounds[next].number;
    }

    // Odd entrant counts leave the last matchup as a bye slot; it is
    // seeded by the round's final arrival and resolves immediately.
    let last = tournament.rounds[next].matchups.len() - 1;
    let is_bye_slot = tournament.rounds[next].entrant_count % 2 == 1 && placed == last;
    if is_bye_slot {
        let slot = &mut tournament.rounds[next].matchups[last];
        slot.winner = Some(winner.clone());
        slot.status = MatchupStatus::Completed;
        advance_winner(tournament, next, winner)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn engine() -> BracketEngine<StdRng> {
        BracketEngine::with_rng(StdRng::seed_from_u64(42))
    }

    fn participants(n: usize) -> Vec<Participant> {
        (0..n)
            .map(|i| Participant::new(format!("Player {i}"), 1000 + i as u32 * 10))
            .collect()
    }

    fn tournament_with(n: usize) -> Tournament {
        let mut tournament = Tournament::new("Club Open", "Test bracket", 32);
        tournament.participants = participants(n);
        tournament
    }

    #[test]
    fn test_generate_rejects_single_participant() {
        let err = engine().generate_bracket(&participants(1)).unwrap_err();
        assert_eq!(
            err,
            BracketError::InsufficientParticipants {
                needed: 2,
                current: 1
            }
        );
    }

    #[test]
    fn test_two_participants_single_final_round() {
        let rounds = engine().generate_bracket(&participants(2)).unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].name, "Final");
        assert_eq!(rounds[0].matchups.len(), 1);
        assert_eq!(rounds[0].matchups[0].status, MatchupStatus::Pending);
    }

    #[test]
    fn test_three_participants_bye_and_final() {
        let rounds = engine().generate_bracket(&participants(3)).unwrap();
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].name, "Round 1");
        assert_eq!(rounds[0].matchups.len(), 2);
        assert_eq!(rounds[1].name, "Final");
        assert_eq!(rounds[1].matchups.len(), 1);

        let byes = rounds[0].matchups.iter().filter(|m| m.is_bye()).count();
        assert_eq!(byes, 1);

        // The bye holder is already seeded into the final.
        let bye_winner = rounds[0]
            .matchups
            .iter()
            .find(|m| m.is_bye())
            .and_then(|m| m.winner.clone())
            .unwrap();
        assert_eq!(
            rounds[1].matchups[0].player1.as_ref().map(|p| p.id),
            Some(bye_winner.id)
        );
    }

    #[test]
    fn test_eight_participants_round_names() {
        let rounds = engine().generate_bracket(&participants(8)).unwrap();
        let names: Vec<&str> = rounds.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Round 1", "Semi-Final", "Final"]);
        assert_eq!(rounds[0].matchups.len(), 4);
        assert_eq!(rounds[1].matchups.len(), 2);
        assert_eq!(rounds[2].matchups.len(), 1);
    }

    #[test]
    fn test_sixteen_participants_has_quarter_finals() {
        let rounds = engine().generate_bracket(&participants(16)).unwrap();
        let names: Vec<&str> = rounds.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Round 1", "Quarter-Final", "Semi-Final", "Final"]);
    }

    #[test]
    fn test_thirtytwo_participants_names_round_16() {
        let rounds = engine().generate_bracket(&participants(32)).unwrap();
        assert_eq!(rounds[1].name, "Round 16");
    }

    #[test]
    fn test_round_one_is_a_permutation_of_entrants() {
        let entrants = participants(9);
        let rounds = engine().generate_bracket(&entrants).unwrap();

        let mut seen: Vec<ParticipantId> = rounds[0]
            .matchups
            .iter()
            .flat_map(|m| [m.player1.as_ref(), m.player2.as_ref()])
            .flatten()
            .map(|p| p.id)
            .collect();
        seen.sort();
        let mut expected: Vec<ParticipantId> = entrants.iter().map(|p| p.id).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_register_respects_capacity() {
        let mut tournament = Tournament::new("Tiny Cup", "", 2);
        let engine = engine();
        engine
            .register_participant(&mut tournament, Participant::new("A", 1000))
            .unwrap();
        engine
            .register_participant(&mut tournament, Participant::new("B", 1100))
            .unwrap();

        let err = engine
            .register_participant(&mut tournament, Participant::new("C", 1200))
            .unwrap_err();
        assert_eq!(err, BracketError::TournamentFull);
        assert_eq!(tournament.participants.len(), 2);
    }

    #[test]
    fn test_register_rejects_duplicate_id() {
        let mut tournament = Tournament::new("Cup", "", 8);
        let engine = engine();
        let player = Participant::new("A", 1000);
        engine
            .register_participant(&mut tournament, player.clone())
            .unwrap();
        let err = engine
            .register_participant(&mut tournament, player)
            .unwrap_err();
        assert_eq!(err, BracketError::AlreadyRegistered);
    }

    #[test]
    fn test_withdraw_unknown_id_is_noop() {
        let mut tournament = tournament_with(3);
        let engine = engine();
        engine
            .withdraw_participant(&mut tournament, Uuid::new_v4())
            .unwrap();
        assert_eq!(tournament.participants.len(), 3);
    }

    #[test]
    fn test_withdraw_after_start_fails() {
        let mut tournament = tournament_with(4);
        let mut engine = engine();
        engine.start_tournament(&mut tournament).unwrap();
        let gone = tournament.participants[0].id;
        let err = engine
            .withdraw_participant(&mut tournament, gone)
            .unwrap_err();
        assert!(matches!(err, BracketError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_start_sets_in_progress_and_round_one() {
        let mut tournament = tournament_with(5);
        let mut engine = engine();
        engine.start_tournament(&mut tournament).unwrap();

        assert_eq!(tournament.status, TournamentStatus::InProgress);
        assert_eq!(tournament.current_round, 1);
        assert_eq!(tournament.rounds.len(), 3);
        assert!(tournament.start_date.is_some());
    }

    #[test]
    fn test_start_with_one_participant_fails() {
        let mut tournament = tournament_with(1);
        let err = engine().start_tournament(&mut tournament).unwrap_err();
        assert_eq!(
            err,
            BracketError::InsufficientParticipants {
                needed: 2,
                current: 1
            }
        );
        assert_eq!(tournament.status, TournamentStatus::Registration);
        assert!(tournament.rounds.is_empty());
    }

    #[test]
    fn test_record_winner_requires_in_progress() {
        let mut tournament = tournament_with(4);
        let err = engine()
            .record_winner(&mut tournament, 0, 0, Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, BracketError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_record_winner_bad_index_is_invalid_matchup() {
        let mut tournament = tournament_with(4);
        let mut engine = engine();
        engine.start_tournament(&mut tournament).unwrap();

        let err = engine
            .record_winner(&mut tournament, 5, 0, Uuid::new_v4())
            .unwrap_err();
        assert_eq!(err, BracketError::InvalidMatchup { round: 5, matchup: 0 });

        let err = engine
            .record_winner(&mut tournament, 0, 9, Uuid::new_v4())
            .unwrap_err();
        assert_eq!(err, BracketError::InvalidMatchup { round: 0, matchup: 9 });
    }

    #[test]
    fn test_record_winner_rejects_half_seeded_matchup() {
        let mut tournament = tournament_with(8);
        let mut engine = engine();
        engine.start_tournament(&mut tournament).unwrap();

        // Decide one round-1 matchup; its winner now sits alone in a
        // waiting semi-final slot.
        let winner_id = tournament.rounds[0].matchups[0]
            .player1
            .as_ref()
            .unwrap()
            .id;
        engine
            .record_winner(&mut tournament, 0, 0, winner_id)
            .unwrap();
        assert_eq!(tournament.rounds[1].matchups[0].status, MatchupStatus::Waiting);

        // That semi-final cannot be decided until both slots are filled.
        let err = engine
            .record_winner(&mut tournament, 1, 0, winner_id)
            .unwrap_err();
        assert!(matches!(err, BracketError::InvalidStateTransition { .. }));
        assert!(tournament.rounds[1].matchups[0].winner.is_none());
    }

    #[test]
    fn test_record_winner_rejects_outsider() {
        let mut tournament = tournament_with(4);
        let mut engine = engine();
        engine.start_tournament(&mut tournament).unwrap();

        let err = engine
            .record_winner(&mut tournament, 0, 0, Uuid::new_v4())
            .unwrap_err();
        assert_eq!(err, BracketError::InvalidWinner);
    }

    #[test]
    fn test_record_winner_twice_fails_second_time() {
        let mut tournament = tournament_with(4);
        let mut engine = engine();
        engine.start_tournament(&mut tournament).unwrap();

        let winner_id = tournament.rounds[0].matchups[0]
            .player1
            .as_ref()
            .unwrap()
            .id;
        engine
            .record_winner(&mut tournament, 0, 0, winner_id)
            .unwrap();
        let err = engine
            .record_winner(&mut tournament, 0, 0, winner_id)
            .unwrap_err();
        assert!(matches!(err, BracketError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_final_winner_completes_tournament() {
        let mut tournament = tournament_with(2);
        let mut engine = engine();
        engine.start_tournament(&mut tournament).unwrap();

        let champion = tournament.rounds[0].matchups[0]
            .player2
            .as_ref()
            .unwrap()
            .id;
        engine
            .record_winner(&mut tournament, 0, 0, champion)
            .unwrap();

        assert_eq!(tournament.status, TournamentStatus::Completed);
        assert_eq!(tournament.winner.as_ref().map(|w| w.id), Some(champion));
        assert_eq!(tournament.rounds.len(), 1);
        assert!(tournament.end_date.is_some());
    }

    #[test]
    fn test_advancement_fills_slots_and_flips_ready() {
        let mut tournament = tournament_with(4);
        let mut engine = engine();
        engine.start_tournament(&mut tournament).unwrap();

        let first = tournament.rounds[0].matchups[0]
            .player1
            .as_ref()
            .unwrap()
            .id;
        engine.record_winner(&mut tournament, 0, 0, first).unwrap();

        let final_round = &tournament.rounds[1];
        assert_eq!(
            final_round.matchups[0].player1.as_ref().map(|p| p.id),
            Some(first)
        );
        assert_eq!(final_round.matchups[0].status, MatchupStatus::Waiting);

        let second = tournament.rounds[0].matchups[1]
            .player2
            .as_ref()
            .unwrap()
            .id;
        engine.record_winner(&mut tournament, 0, 1, second).unwrap();

        let final_round = &tournament.rounds[1];
        assert_eq!(final_round.matchups[0].status, MatchupStatus::Ready);
        assert_eq!(tournament.current_round, 2);
        assert_eq!(tournament.rounds[0].status, RoundStatus::Completed);
        assert_eq!(tournament.rounds[1].status, RoundStatus::InProgress);
    }

    #[test]
    fn test_cancel_from_registration_and_in_progress() {
        let engine_ref = engine();
        let mut open = tournament_with(4);
        engine_ref.cancel_tournament(&mut open).unwrap();
        assert_eq!(open.status, TournamentStatus::Cancelled);

        let mut running = tournament_with(4);
        let mut engine_mut = engine();
        engine_mut.start_tournament(&mut running).unwrap();
        engine_ref.cancel_tournament(&mut running).unwrap();
        assert_eq!(running.status, TournamentStatus::Cancelled);

        // Terminal: nothing further is accepted.
        let err = engine_ref.cancel_tournament(&mut running).unwrap_err();
        assert!(matches!(err, BracketError::InvalidStateTransition { .. }));
        let err = engine_ref
            .register_participant(&mut running, Participant::new("Z", 900))
            .unwrap_err();
        assert!(matches!(err, BracketError::InvalidStateTransition { .. }));
    }
}
