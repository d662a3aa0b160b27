//! holdem-advisor: Texas Hold'em decision support
//!
//! Goals:
//! - A betting round state machine that validates every action before applying it
//! - Monte Carlo win probability, parallel and reproducible from a seed
//! - A bet-sizing heuristic driven by hand strength, stack depth, street and
//!   opponent tendencies
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: advise a hand
//! ```
//! use holdem_advisor::config::{EngineConfig, SimulationConfig, TableConfig};
//! use holdem_advisor::engine::Engine;
//! use holdem_advisor::hand::{Board, HoleCards};
//!
//! let config = EngineConfig::new(TableConfig::new(2, 1000, 10, 20))
//!     .with_simulation(SimulationConfig::new(2_000).with_seed(42));
//! let engine = Engine::new(config).unwrap();
//!
//! let hole: HoleCards = "Ah Ad".parse().unwrap();
//! let board: Board = "Kc 7d 2s".parse().unwrap();
//! let estimate = engine.win_probability(&hole, &board, &[], 1).unwrap();
//! assert!(estimate.probability() > 0.7);
//! ```
//!
//! Logging goes through the `log` facade; install any logger to see hand
//! boundaries (`info`), decisions (`debug`) and individual actions (`trace`).

pub mod agents;
pub mod cards;
pub mod config;
pub mod decision;
pub mod deck;
pub mod engine;
pub mod equity;
pub mod evaluator;
pub mod game;
pub mod hand;
pub mod opponent;
pub mod strategy;
pub mod strength;
pub mod table;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
