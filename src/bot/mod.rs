//! Heuristic bot: candidate generation, scoring and selection.

pub mod candidates;
pub mod config;
pub mod engine;
pub mod evaluator;

pub use config::{BotConfig, HeuristicWeights};
pub use engine::{BotEngine, BotTurn, ScoredPlacement};
pub use evaluator::{evaluate, ScoreBreakdown};
