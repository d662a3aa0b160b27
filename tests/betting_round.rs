use holdem_advisor::agents::{AdvisedAgent, AgentTable, CallingStation, ScriptedAgent};
use holdem_advisor::cards::parse_cards;
use holdem_advisor::config::{EngineConfig, SimulationConfig, TableConfig};
use holdem_advisor::engine::{Engine, RoundError};
use holdem_advisor::game::{Action, ActionKind, Street};
use holdem_advisor::table::Table;

fn mk_engine(n: usize) -> Engine {
    let config = EngineConfig::new(TableConfig::new(n, 1000, 10, 20))
        .with_simulation(SimulationConfig::new(2_000).with_seed(9).with_preflop_iterations(200));
    Engine::new(config).unwrap()
}

fn mk_table(engine: &Engine, dealer: usize) -> Table {
    Table::new(engine.config().table.clone(), dealer).unwrap()
}

#[test]
fn button_folds_small_blind_completes_big_blind_checks() {
    let engine = mk_engine(3);
    let mut table = mk_table(&engine, 0);
    table.start_hand(None).unwrap();
    let mut agents = AgentTable::for_seats(3)
        .with_agent(0, ScriptedAgent::new([Action::Fold]))
        .with_agent(1, ScriptedAgent::new([Action::Call]))
        .with_agent(2, ScriptedAgent::new([Action::Check]));

    let summary = engine.play_round(&mut table, &mut agents).unwrap();
    assert_eq!(summary.pot, 40);
    assert_eq!(summary.actions, vec![(0, Action::Fold), (1, Action::Call), (2, Action::Check)]);
    assert_eq!(summary.rejections, 0);
    assert_eq!(summary.uncontested, None);
    let players = table.players();
    assert_eq!(players[1].last_bet(), 20);
    assert_eq!(players[2].last_bet(), 20);
    assert_eq!(players[1].chips(), 980);
}

#[test]
fn invalid_actions_are_asked_again() {
    let engine = mk_engine(3);
    let mut table = mk_table(&engine, 0);
    table.start_hand(None).unwrap();
    let mut agents = AgentTable::for_seats(3)
        .with_agent(0, ScriptedAgent::new([Action::Raise(5), Action::Check, Action::Call]))
        .with_agent(1, ScriptedAgent::new([Action::Fold]))
        .with_agent(2, ScriptedAgent::new([Action::Check]));

    let summary = engine.play_round(&mut table, &mut agents).unwrap();
    assert_eq!(summary.rejections, 2);
    assert_eq!(summary.actions[0], (0, Action::Call));
    assert_eq!(summary.pot, 50);
    // only applied actions reach the opponent history
    assert_eq!(table.history().actions(0), &[ActionKind::Call]);
}

#[test]
fn reraise_reopens_action_for_callers() {
    let engine = mk_engine(3);
    let mut table = mk_table(&engine, 0);
    table.start_hand(None).unwrap();
    let mut agents = AgentTable::for_seats(3)
        .with_agent(0, ScriptedAgent::new([Action::Raise(40), Action::Call]))
        .with_agent(1, ScriptedAgent::new([Action::Call, Action::Fold]))
        .with_agent(2, ScriptedAgent::new([Action::Raise(100)]));

    let summary = engine.play_round(&mut table, &mut agents).unwrap();
    assert_eq!(summary.current_bet, 160);
    assert_eq!(
        summary.actions,
        vec![
            (0, Action::Raise(40)),
            (1, Action::Call),
            (2, Action::Raise(100)),
            (0, Action::Call),
            (1, Action::Fold),
        ]
    );
    assert_eq!(summary.pot, 160 + 60 + 160);
}

#[test]
fn everyone_folding_leaves_an_uncontested_winner() {
    let engine = mk_engine(4);
    let mut table = mk_table(&engine, 0);
    table.start_hand(None).unwrap();
    let mut agents = AgentTable::for_seats(4)
        .with_agent(0, ScriptedAgent::default())
        .with_agent(1, ScriptedAgent::default())
        .with_agent(2, ScriptedAgent::default())
        .with_agent(3, ScriptedAgent::default());

    let summary = engine.play_round(&mut table, &mut agents).unwrap();
    assert_eq!(summary.uncontested, Some(2));
    assert_eq!(summary.pot, 30);
    table.finish_hand(&[2]).unwrap();
    assert_eq!(table.players()[2].chips(), 1010);
    assert_eq!(table.players()[1].chips(), 990);
}

#[test]
fn empty_seat_is_an_error() {
    let engine = mk_engine(3);
    let mut table = mk_table(&engine, 0);
    table.start_hand(None).unwrap();
    let mut agents = AgentTable::for_seats(3).with_agent(1, CallingStation);
    let err = engine.play_round(&mut table, &mut agents).unwrap_err();
    assert_eq!(err, RoundError::NoAgent(0));
}

#[test]
fn hero_follows_advice_across_streets() {
    let engine = mk_engine(3);
    let mut table = mk_table(&engine, 0);
    table.start_hand(Some((0, "Ah Ad".parse().unwrap()))).unwrap();
    let mut agents = AgentTable::for_seats(3)
        .with_agent(0, AdvisedAgent::new())
        .with_agent(1, CallingStation)
        .with_agent(2, CallingStation);

    // aces three-handed simulate well above 45%: a minimum raise
    let preflop = engine.play_round(&mut table, &mut agents).unwrap();
    assert_eq!(preflop.actions[0], (0, Action::Raise(20)));
    assert_eq!(preflop.pot, 120);
    assert_eq!(table.history().opponents_of(0).len(), 2);

    table.advance_street(&parse_cards("Kc 7d 2s").unwrap()).unwrap();
    let flop = engine.play_round(&mut table, &mut agents).unwrap();
    assert_eq!(flop.street, Street::Flop);
    assert!(flop.actions.iter().any(|&(seat, _)| seat == 0));
    assert!(flop.pot >= 120);
    assert_eq!(flop.rejections, 0);

    table.finish_hand(&[0]).unwrap();
    let total: u64 = table.players().iter().map(|p| p.chips()).sum();
    assert_eq!(total, 3000);
}
