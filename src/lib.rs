//! # rust-blokus
//!
//! A four-color polyomino placement game engine with rule validation, turn
//! flow, a heuristic bot and a concurrent game service.
//!
//! ## Design Principles
//!
//! 1. **One rule path**: Humans and bots place pieces through the same
//!    `rules::apply`, which re-validates and commits all-or-nothing.
//!
//! 2. **Typed state**: Moves, seats and results are typed values, and the
//!    whole `GameState` round-trips through serde.
//!
//! 3. **Per-game serialization**: Each game has its own lock and its own
//!    bot-chain token; different games never contend.
//!
//! ## Architecture
//!
//! - **Anchored search**: Legal moves are enumerated from diagonal corner
//!   cells rather than by scanning the whole board.
//!
//! - **Persistent Data Structures**: Move history uses `im-rs` for O(1)
//!   snapshot clones.
//!
//! - **Deterministic bots**: Selection randomness comes from a seeded
//!   ChaCha stream per game.
//!
//! ## Modules
//!
//! - `core`: Colors, ids, seats, state, RNG, configuration, errors
//! - `pieces`: The 21-piece catalog and orientations
//! - `board`: The 20x20 grid
//! - `rules`: Placement validation, move search, turns, scoring
//! - `bot`: Candidate generation, heuristic and selection
//! - `service`: Async game service, bot chains, timers, collaborators

pub mod board;
pub mod bot;
pub mod core;
pub mod pieces;
pub mod rules;
pub mod service;

// Re-export commonly used types
pub use crate::core::{
    Color, ColorMap, ColorSet, EngineError, EngineResult, GameConfig, GameId, GameRng,
    GameState, GameStatus, PacingConfig, PieceId, PieceSet, PlacedMove, PlayerSlot,
    Point, RejectReason, ScoreBasis, ScoringRule, ServiceConfig, BOARD_SIZE,
};

pub use crate::pieces::{Orientation, OrientationKey, PieceCatalog, PieceShape};

pub use crate::board::Board;

pub use crate::rules::{GameResult, Placement, PlacementDelta, SkipReason, TurnAdvance};

pub use crate::bot::{BotConfig, BotEngine, HeuristicWeights};

pub use crate::service::{
    ChannelSink, EventSink, GameEvent, GameRepository, GameService, GameSetup,
    InMemoryRepository, NullSink, RecordingSink,
};
