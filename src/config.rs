//! Table, simulation and decision settings.

use crate::deck::DECK_SIZE;
use crate::hand::BOARD_SIZE;
use crate::strategy::StrategyTable;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("player count must be between 2 and {max}, got {got}")]
    PlayerCount { max: usize, got: usize },
    #[error("blinds must be positive with small <= big (small {small}, big {big})")]
    Blinds { small: u64, big: u64 },
    #[error("minimum bet must be positive")]
    MinimumBet,
    #[error("starting stack must be positive")]
    StartingStack,
    #[error("dealer seat {dealer} out of range for {players} players")]
    DealerSeat { dealer: usize, players: usize },
    #[error("simulation needs at least one iteration")]
    Iterations,
    #[error("invalid decision setting: {0}")]
    Decision(&'static str),
}

/// Most players a single deck can serve: two hole cards each plus the board.
pub const MAX_PLAYERS: usize = (DECK_SIZE - BOARD_SIZE) / 2;

/// Stakes and seats for one cash table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TableConfig {
    pub num_players: usize,
    pub starting_stack: u64,
    pub small_blind: u64,
    pub big_blind: u64,
    pub minimum_bet: u64,
}

impl TableConfig {
    pub fn new(num_players: usize, starting_stack: u64, small_blind: u64, big_blind: u64) -> Self {
        Self { num_players, starting_stack, small_blind, big_blind, minimum_bet: big_blind }
    }

    pub fn with_minimum_bet(mut self, minimum_bet: u64) -> Self {
        self.minimum_bet = minimum_bet;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(ConfigError::PlayerCount { max: MAX_PLAYERS, got: self.num_players });
        }
        if self.small_blind == 0 || self.small_blind > self.big_blind {
            return Err(ConfigError::Blinds { small: self.small_blind, big: self.big_blind });
        }
        if self.minimum_bet == 0 {
            return Err(ConfigError::MinimumBet);
        }
        if self.starting_stack == 0 {
            return Err(ConfigError::StartingStack);
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(3, 1000, 10, 20)
    }
}

/// Monte Carlo budget. A fixed seed makes every estimate reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SimulationConfig {
    /// Iterations for a full-hand estimate.
    pub iterations: u32,
    /// Iterations per suit combination in the preflop estimate.
    pub preflop_iterations: u32,
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn new(iterations: u32) -> Self {
        Self { iterations, ..Self::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_preflop_iterations(mut self, iterations: u32) -> Self {
        self.preflop_iterations = iterations;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 || self.preflop_iterations == 0 {
            return Err(ConfigError::Iterations);
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { iterations: 10_000, preflop_iterations: 1_000, seed: None }
    }
}

/// Knobs for threshold adjustment in the decision heuristic.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct DecisionConfig {
    /// Stacks at or above this many big blinds count as deep.
    pub deep_stack_bb: f64,
    /// Stacks at or below this many big blinds count as short.
    pub short_stack_bb: f64,
    /// Threshold shift applied per adjustment.
    pub stage_adjustment: f64,
    /// Bluff frequency multiplier against aggressive opponents.
    pub aggression_bluff_factor: f64,
}

impl DecisionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.short_stack_bb >= 0.0 && self.short_stack_bb < self.deep_stack_bb) {
            return Err(ConfigError::Decision("short stack depth must be below deep stack depth"));
        }
        if !(0.0..=0.5).contains(&self.stage_adjustment) {
            return Err(ConfigError::Decision("stage adjustment must be within [0, 0.5]"));
        }
        if !(self.aggression_bluff_factor >= 1.0 && self.aggression_bluff_factor.is_finite()) {
            return Err(ConfigError::Decision("aggression bluff factor must be at least 1"));
        }
        Ok(())
    }
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            deep_stack_bb: 100.0,
            short_stack_bb: 20.0,
            stage_adjustment: 0.05,
            aggression_bluff_factor: 1.5,
        }
    }
}

/// Everything the [`Engine`](crate::engine::Engine) needs.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct EngineConfig {
    pub table: TableConfig,
    pub simulation: SimulationConfig,
    pub decision: DecisionConfig,
    pub strategy: StrategyTable,
}

impl EngineConfig {
    pub fn new(table: TableConfig) -> Self {
        Self { table, ..Self::default() }
    }

    pub fn with_simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = simulation;
        self
    }

    pub fn with_decision(mut self, decision: DecisionConfig) -> Self {
        self.decision = decision;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyTable) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.table.validate()?;
        self.simulation.validate()?;
        self.decision.validate()
    }
}
