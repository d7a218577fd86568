//! Core engine types: colors, ids, seats, state, RNG, configuration, errors.
//!
//! Everything else in the crate builds on these.

pub mod color;
pub mod config;
pub mod error;
pub mod ids;
pub mod player;
pub mod rng;
pub mod state;

pub use color::{Color, ColorMap, ColorSet, BOARD_SIZE};
pub use config::{GameConfig, PacingConfig, ScoreBasis, ScoringRule, ServiceConfig};
pub use error::{EngineError, EngineResult, RejectReason};
pub use ids::{GameId, PieceId, Point};
pub use player::{PieceSet, PlayerSlot};
pub use rng::GameRng;
pub use state::{GameState, GameStatus, PlacedMove};
