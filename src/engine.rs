//! The engine facade: configuration and a hand ranker bound together behind
//! the entry points callers use.

use crate::agents::{AgentTable, Turn};
use crate::cards::Card;
use crate::config::{ConfigError, EngineConfig};
use crate::decision::{
    equity_action, DecisionEngine, DecisionInput, EquityAction, Recommendation, Stage,
};
use crate::equity::{
    estimate_win_probability, preflop_equity, EquityError, EquityEstimate, PreflopEquity,
};
use crate::evaluator::{HandRanker, StandardRanker};
use crate::game::{ActionKind, BettingRound, HandState, Player, RoundStatus, RoundSummary};
use crate::hand::{Board, HoleCards};
use crate::opponent::{classify, OpponentHistory};
use crate::strength::{category_label, strength};
use crate::table::{Table, TableError};
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// The seat the engine advises and the cards it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hero {
    pub seat: usize,
    pub hole: HoleCards,
}

/// Everything the engine tells the hero before they act.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advice {
    /// Simulated chance of winning outright against the live opponents.
    pub win_probability: f64,
    pub quick: EquityAction,
    pub recommendation: Recommendation,
    /// Current made hand, once five cards are visible.
    pub hand_label: Option<&'static str>,
}

/// One decision point for the hero.
#[derive(Debug, Clone, Copy)]
pub struct AdviceRequest<'a> {
    pub hole: &'a HoleCards,
    pub board: &'a Board,
    /// Cards that cannot be dealt to anyone else. May repeat hole and board cards.
    pub known: &'a [Card],
    pub pot: u64,
    pub call_amount: u64,
    pub opponent_actions: &'a [ActionKind],
    pub player_stack: u64,
    pub opponent_stack: u64,
    pub stage: Stage,
    pub num_opponents: usize,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("seat {0} has no agent")]
    NoAgent(usize),
    #[error(transparent)]
    Equity(#[from] EquityError),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Ranker and settings. Cheap to share; every method takes `&self`.
#[derive(Debug)]
pub struct Engine<H = StandardRanker> {
    config: EngineConfig,
    ranker: H,
    /// Betting rounds driven so far; picks the decision rng stream.
    rounds: AtomicU64,
}

impl<H: Clone> Clone for Engine<H> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            ranker: self.ranker.clone(),
            rounds: AtomicU64::new(self.rounds.load(Ordering::Relaxed)),
        }
    }
}

impl Engine<StandardRanker> {
    /// Validate `config` and pair it with the standard 7462-class ranker.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_ranker(config, StandardRanker)
    }
}

impl<H: HandRanker> Engine<H> {
    pub fn with_ranker(config: EngineConfig, ranker: H) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, ranker, rounds: AtomicU64::new(0) })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ranker(&self) -> &H {
        &self.ranker
    }

    fn seed(&self) -> u64 {
        self.config.simulation.seed.unwrap_or_else(|| rand::rng().random())
    }

    /// Decision rng for the next betting round: one ChaCha stream per round,
    /// so a seeded session replays exactly without repeating its rolls.
    fn round_rng(&self) -> ChaCha8Rng {
        let round = self.rounds.fetch_add(1, Ordering::Relaxed);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed());
        rng.set_stream(round);
        rng
    }

    /// Monte Carlo estimate with the configured iteration count.
    pub fn win_probability(
        &self,
        hole: &HoleCards,
        board: &Board,
        known: &[Card],
        num_opponents: usize,
    ) -> Result<EquityEstimate, EquityError> {
        estimate_win_probability(
            &self.ranker,
            hole,
            board,
            known,
            num_opponents,
            self.config.simulation.iterations,
            self.seed(),
        )
    }

    /// Per-suit-combination preflop estimate.
    pub fn preflop_breakdown(
        &self,
        hole: &HoleCards,
        num_opponents: usize,
    ) -> Result<PreflopEquity, EquityError> {
        preflop_equity(
            &self.ranker,
            hole,
            num_opponents,
            self.config.simulation.preflop_iterations,
            self.seed(),
        )
    }

    /// Preflop win probability of `hole`'s rank pattern against every other seat.
    pub fn preflop_equity(&self, hole: &HoleCards) -> Result<f64, EquityError> {
        let opponents = self.config.table.num_players.saturating_sub(1);
        Ok(self.preflop_breakdown(hole, opponents)?.probability())
    }

    /// Run the decision heuristic. Before the flop this is
    /// [`Recommendation::InsufficientInformation`].
    ///
    /// ```
    /// use holdem_advisor::decision::{Stage, SuggestedAction};
    /// use holdem_advisor::engine::{AdviceRequest, Engine};
    /// use holdem_advisor::config::EngineConfig;
    /// use rand::SeedableRng;
    ///
    /// let engine = Engine::new(EngineConfig::default()).unwrap();
    /// let hole = "As Ks".parse().unwrap();
    /// let board = "Qs Js Ts 2c".parse().unwrap();
    /// let request = AdviceRequest {
    ///     hole: &hole,
    ///     board: &board,
    ///     known: &[],
    ///     pot: 100,
    ///     call_amount: 0,
    ///     opponent_actions: &[],
    ///     player_stack: 1000,
    ///     opponent_stack: 1000,
    ///     stage: Stage::Late,
    ///     num_opponents: 1,
    /// };
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
    /// let play = engine.recommend(&request, &mut rng).play().unwrap();
    /// assert_eq!(play.action, SuggestedAction::Bet);
    /// ```
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        request: &AdviceRequest<'_>,
        rng: &mut R,
    ) -> Recommendation {
        let input = DecisionInput {
            strength: strength(&self.ranker, &request.hole.as_array(), request.board.as_slice()),
            pot: request.pot,
            call_amount: request.call_amount,
            player_stack: request.player_stack,
            opponent_stack: request.opponent_stack,
            stage: request.stage,
            opponent: classify(request.opponent_actions),
        };
        DecisionEngine::new(&self.config.table, &self.config.decision, &self.config.strategy)
            .decide(&input, rng)
    }

    /// Simulated equity, quick advice and the heuristic recommendation together.
    pub fn advise<R: Rng + ?Sized>(
        &self,
        request: &AdviceRequest<'_>,
        rng: &mut R,
    ) -> Result<Advice, EquityError> {
        let estimate = self.win_probability(
            request.hole,
            request.board,
            request.known,
            request.num_opponents,
        )?;
        let win_probability = estimate.probability();
        let advice = Advice {
            win_probability,
            quick: equity_action(win_probability),
            recommendation: self.recommend(request, rng),
            hand_label: category_label(
                &self.ranker,
                &request.hole.as_array(),
                request.board.as_slice(),
            ),
        };
        debug!("advice: {advice:?}");
        Ok(advice)
    }

    fn advise_seat<R: Rng + ?Sized>(
        &self,
        round: &BettingRound<'_>,
        hero: &Hero,
        history: &OpponentHistory,
        rng: &mut R,
    ) -> Result<Advice, EquityError> {
        let hand = round.hand();
        let players = round.players();
        let live_opponents = || {
            players.iter().enumerate().filter(|(i, p)| *i != hero.seat && !p.is_folded())
        };
        let opponent_actions = history.opponents_of(hero.seat);
        let request = AdviceRequest {
            hole: &hero.hole,
            board: hand.board(),
            known: hand.known_cards(),
            pot: hand.pot(),
            call_amount: round.owed(hero.seat),
            opponent_actions: &opponent_actions,
            player_stack: players.get(hero.seat).map_or(0, |p| p.chips()),
            opponent_stack: live_opponents().map(|(_, p)| p.chips()).max().unwrap_or(0),
            stage: Stage::from_board_len(hand.board().len()),
            num_opponents: live_opponents().count(),
        };
        self.advise(&request, rng)
    }

    /// Drive one street of betting to completion.
    ///
    /// The agent at each acting seat is asked for an action; the hero's agent
    /// also receives [`Advice`]. Rejected actions go back to the agent, which
    /// is asked again. Applied actions are appended to `history`.
    pub fn run_betting_round(
        &self,
        players: &mut [Player],
        hand: &mut HandState,
        agents: &mut AgentTable,
        history: &mut OpponentHistory,
        hero: Option<&Hero>,
    ) -> Result<RoundSummary, RoundError> {
        let street = hand.street();
        let mut rng = self.round_rng();
        let mut round = BettingRound::new(players, hand, &self.config.table);
        let mut actions = Vec::new();
        let mut rejections = 0;
        let mut advice: Option<Advice> = None;
        info!("{street} betting opens, pot {}", round.hand().pot());

        while let RoundStatus::AwaitingAction(seat) = round.status() {
            if let Some(h) = hero.filter(|h| h.seat == seat) {
                if advice.is_none() {
                    advice = Some(self.advise_seat(&round, h, history, &mut rng)?);
                }
            }
            let legal = round.legal_actions(seat);
            let turn = Turn {
                seat,
                street,
                pot: round.hand().pot(),
                current_bet: round.hand().current_bet(),
                owed: round.owed(seat),
                chips: round.players()[seat].chips(),
                minimum_bet: round.minimum_bet(),
                legal: &legal,
                advice: advice.as_ref(),
            };
            let action = agents.act(&turn).ok_or(RoundError::NoAgent(seat))?;
            match round.apply(seat, action) {
                Ok(_) => {
                    history.record(seat, action.kind());
                    actions.push((seat, action));
                    if hero.is_some_and(|h| h.seat == seat) {
                        advice = None;
                    }
                }
                Err(err) => {
                    warn!("seat {seat} {action} rejected: {err}");
                    rejections += 1;
                    agents.reject(seat, action, &err);
                }
            }
        }

        let summary = RoundSummary {
            street,
            pot: round.hand().pot(),
            current_bet: round.hand().current_bet(),
            actions,
            rejections,
            uncontested: round.uncontested(),
        };
        info!(
            "{street} betting closed: pot {}, {} actions, {} rejected",
            summary.pot,
            summary.actions.len(),
            summary.rejections
        );
        Ok(summary)
    }

    /// [`run_betting_round`](Self::run_betting_round) on a table's current hand.
    pub fn play_round(
        &self,
        table: &mut Table,
        agents: &mut AgentTable,
    ) -> Result<RoundSummary, RoundError> {
        let (players, hand, history, hero) = table.round_parts()?;
        let hero = hero.copied();
        self.run_betting_round(players, hand, agents, history, hero.as_ref())
    }
}
