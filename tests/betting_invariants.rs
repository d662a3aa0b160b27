use holdem_advisor::agents::{AgentTable, PlayerAgent, Turn};
use holdem_advisor::config::{EngineConfig, TableConfig};
use holdem_advisor::deck::Deck;
use holdem_advisor::engine::Engine;
use holdem_advisor::game::{Action, ActionKind, Street};
use holdem_advisor::table::Table;
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Picks uniformly among the legal actions, raising a random legal amount.
struct RandomAgent(ChaCha8Rng);

impl PlayerAgent for RandomAgent {
    fn act(&mut self, turn: &Turn<'_>) -> Action {
        match turn.legal[self.0.random_range(0..turn.legal.len())] {
            ActionKind::Fold => Action::Fold,
            ActionKind::Check => Action::Check,
            ActionKind::Call => Action::Call,
            ActionKind::AllIn => Action::AllIn,
            ActionKind::Raise => {
                let max = turn.max_raise();
                if max < turn.minimum_bet {
                    Action::Call
                } else {
                    Action::Raise(self.0.random_range(turn.minimum_bet..=max))
                }
            }
        }
    }
}

fn check_table(table: &Table, stacks: u64) {
    let hand = table.hand().unwrap();
    let players = table.players();
    for p in players.iter().filter(|p| !p.is_folded()) {
        assert!(
            p.last_bet() == hand.current_bet() || p.chips() == 0,
            "seat {} left the round owing chips",
            p.id()
        );
    }
    let contributed: u64 = players.iter().map(|p| p.contributed()).sum();
    assert_eq!(hand.pot(), contributed);
    let chips: u64 = players.iter().map(|p| p.chips()).sum();
    assert_eq!(chips + hand.pot(), stacks);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_hands_keep_chips_and_commitments_consistent(
        n in 2usize..=6,
        stack in 30u64..400,
        seed in any::<u64>(),
    ) {
        let config = EngineConfig::new(TableConfig::new(n, stack, 5, 10));
        let engine = Engine::new(config).unwrap();
        let mut table = Table::new(engine.config().table.clone(), seed as usize % n).unwrap();
        let mut agents = AgentTable::for_seats(n);
        for seat in 0..n {
            let rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(seat as u64));
            agents.set_agent(seat, Some(Box::new(RandomAgent(rng))));
        }
        let mut deck = Deck::standard();
        deck.shuffle_seeded(seed);

        table.start_hand(None).unwrap();
        let mut pot = 0;
        loop {
            let summary = engine.play_round(&mut table, &mut agents).unwrap();
            prop_assert_eq!(summary.rejections, 0);
            prop_assert!(summary.pot >= pot);
            pot = summary.pot;
            check_table(&table, stack * n as u64);
            if summary.uncontested.is_some() || summary.street == Street::River {
                break;
            }
            let count = if summary.street == Street::Preflop { 3 } else { 1 };
            let cards = deck.deal(count).unwrap();
            table.advance_street(&cards).unwrap();
        }
        let winner = (0..n).find(|&s| !table.players()[s].is_folded()).unwrap();
        table.finish_hand(&[winner]).unwrap();
        let chips: u64 = table.players().iter().map(|p| p.chips()).sum();
        prop_assert_eq!(chips, stack * n as u64);
    }
}
