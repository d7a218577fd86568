//! Outbound game notifications.
//!
//! The service publishes one event per observable change. Delivery is
//! one-way: a sink never reports back and never blocks the game lock for
//! long.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::core::{Color, ColorMap, GameId, GameState};
use crate::rules::{GameResult, PlacementDelta, SkipReason, TurnAdvance};

/// Something that happened in a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PiecePlaced {
        game_id: GameId,
        delta: PlacementDelta,
        by_bot: bool,
    },
    PlayerSkipped {
        game_id: GameId,
        color: Color,
        reason: SkipReason,
    },
    TurnAdvanced {
        game_id: GameId,
        next: Color,
        turn_number: u64,
    },
    GameOver {
        game_id: GameId,
        scores: ColorMap<i32>,
        result: Option<GameResult>,
    },
    BotChainFailed {
        game_id: GameId,
        error: String,
    },
}

impl GameEvent {
    #[must_use]
    pub fn game_id(&self) -> GameId {
        match self {
            GameEvent::PiecePlaced { game_id, .. }
            | GameEvent::PlayerSkipped { game_id, .. }
            | GameEvent::TurnAdvanced { game_id, .. }
            | GameEvent::GameOver { game_id, .. }
            | GameEvent::BotChainFailed { game_id, .. } => *game_id,
        }
    }
}

/// Receiver of game events.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: GameEvent);
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: GameEvent) {}
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<GameEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything published so far.
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Events for one game.
    #[must_use]
    pub fn events_for(&self, game_id: GameId) -> Vec<GameEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.game_id() == game_id)
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: GameEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Forwards events into an unbounded channel for a transport layer.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<GameEvent>,
}

impl ChannelSink {
    /// A sink plus the receiving half of its channel.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GameEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: GameEvent) {
        // A closed receiver means nobody is listening any more.
        let _ = self.tx.send(event);
    }
}

/// Events describing one completed turn, in publication order.
pub(crate) fn turn_events(
    game_id: GameId,
    state: &GameState,
    placed: Option<&PlacementDelta>,
    by_bot: bool,
    advance: &TurnAdvance,
) -> Vec<GameEvent> {
    let mut events = Vec::with_capacity(advance.skipped.len() + 2);
    if let Some(delta) = placed {
        events.push(GameEvent::PiecePlaced {
            game_id,
            delta: delta.clone(),
            by_bot,
        });
    }
    for &(color, reason) in &advance.skipped {
        events.push(GameEvent::PlayerSkipped {
            game_id,
            color,
            reason,
        });
    }
    match advance.next {
        Some(next) => events.push(GameEvent::TurnAdvanced {
            game_id,
            next,
            turn_number: state.turn_number,
        }),
        None => events.push(game_over(game_id, state)),
    }
    events
}

pub(crate) fn game_over(game_id: GameId, state: &GameState) -> GameEvent {
    GameEvent::GameOver {
        game_id,
        scores: state.scores(),
        result: crate::rules::result(state),
    }
}
