//! Game service: per-game locking, bot chains, turn timers, persistence and
//! event collaborators.

pub mod events;
pub mod game_service;
pub mod registry;
pub mod scheduler;
pub mod store;

pub use events::{ChannelSink, EventSink, GameEvent, NullSink, RecordingSink};
pub use game_service::{GameService, GameSetup};
pub use registry::{GameHandle, GameRegistry, LiveGame};
pub use scheduler::{bot_to_move, BotScheduler};
pub use store::{GameRepository, InMemoryRepository};
