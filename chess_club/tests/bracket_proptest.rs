//! Property-based tests for bracket generation and progression.
//!
//! These check the structural invariants over the whole range of
//! entrant counts the club could realistically field.

use chess_club::bracket::{
    BracketEngine, MatchupStatus, Participant, ParticipantId, Tournament, TournamentStatus,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

fn participants(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| Participant::new(format!("Player {i}"), 800 + i as u32))
        .collect()
}

/// ceil(log2(n)) for n >= 2
fn expected_rounds(n: usize) -> usize {
    (usize::BITS - (n - 1).leading_zeros()) as usize
}

proptest! {
    #[test]
    fn round_count_is_ceil_log2(n in 2usize..=64, seed in any::<u64>()) {
        let mut engine = BracketEngine::with_rng(StdRng::seed_from_u64(seed));
        let rounds = engine.generate_bracket(&participants(n)).unwrap();

        prop_assert_eq!(rounds.len(), expected_rounds(n));
        prop_assert_eq!(rounds.last().unwrap().matchups.len(), 1);
    }

    #[test]
    fn round_one_pairs_and_byes(n in 2usize..=64, seed in any::<u64>()) {
        let mut engine = BracketEngine::with_rng(StdRng::seed_from_u64(seed));
        let rounds = engine.generate_bracket(&participants(n)).unwrap();

        let pairs = rounds[0].matchups.iter().filter(|m| !m.is_bye()).count();
        let byes = rounds[0].matchups.iter().filter(|m| m.is_bye()).count();
        prop_assert_eq!(pairs, n / 2);
        prop_assert_eq!(byes, n % 2);
    }

    #[test]
    fn round_one_is_a_partition(n in 2usize..=64, seed in any::<u64>()) {
        let entrants = participants(n);
        let mut engine = BracketEngine::with_rng(StdRng::seed_from_u64(seed));
        let rounds = engine.generate_bracket(&entrants).unwrap();

        let seeded: Vec<ParticipantId> = rounds[0]
            .matchups
            .iter()
            .flat_map(|m| [m.player1.as_ref(), m.player2.as_ref()])
            .flatten()
            .map(|p| p.id)
            .collect();
        let unique: BTreeSet<_> = seeded.iter().copied().collect();

        // No duplicates, none omitted.
        prop_assert_eq!(seeded.len(), n);
        prop_assert_eq!(unique.len(), n);
        for participant in &entrants {
            prop_assert!(unique.contains(&participant.id));
        }
    }

    #[test]
    fn playout_always_crowns_a_registered_champion(n in 2usize..=40, seed in any::<u64>()) {
        let mut engine = BracketEngine::with_rng(StdRng::seed_from_u64(seed));
        let mut tournament = Tournament::new("Prop Cup", "", 64);
        tournament.participants = participants(n);
        engine.start_tournament(&mut tournament).unwrap();

        for round_index in 0..tournament.rounds.len() {
            for matchup_index in 0..tournament.rounds[round_index].matchups.len() {
                let matchup = &tournament.rounds[round_index].matchups[matchup_index];
                if matchup.status == MatchupStatus::Completed {
                    continue;
                }
                // Alternate slots so both paths are exercised.
                let pick = if (round_index + matchup_index) % 2 == 0 {
                    matchup.player1.as_ref()
                } else {
                    matchup.player2.as_ref().or(matchup.player1.as_ref())
                };
                let winner = pick.expect("reached matchup must be seeded").id;
                engine
                    .record_winner(&mut tournament, round_index, matchup_index, winner)
                    .unwrap();
            }
        }

        prop_assert_eq!(tournament.status, TournamentStatus::Completed);
        let champion = tournament.winner.clone().unwrap();
        prop_assert!(tournament.participants.iter().any(|p| p.id == champion.id));

        // Every matchup in every round ended decided; nobody was
        // silently dropped at an odd-sized round.
        for round in &tournament.rounds {
            prop_assert!(round.is_complete());
            let filled: usize = round
                .matchups
                .iter()
                .map(|m| m.player1.iter().count() + m.player2.iter().count())
                .sum();
            prop_assert_eq!(filled, round.entrant_count);
        }
    }

    #[test]
    fn later_rounds_shrink_by_half(n in 2usize..=64, seed in any::<u64>()) {
        let mut engine = BracketEngine::with_rng(StdRng::seed_from_u64(seed));
        let rounds = engine.generate_bracket(&participants(n)).unwrap();

        for window in rounds.windows(2) {
            let produced = window[0].entrant_count.div_ceil(2);
            prop_assert_eq!(window[1].entrant_count, produced);
            prop_assert_eq!(window[1].matchups.len(), produced.div_ceil(2));
        }
    }
}
