//! Bot turn chains and turn timers.
//!
//! ## Bot chains
//!
//! `trigger` takes the game's chain token with `try_acquire_owned`. If another
//! chain already holds it the call is a no-op and returns `None`; triggers
//! are never queued. Otherwise one task is spawned that loops while the
//! current seat is a bot:
//!
//! 1. pacing delay, raced against shutdown
//! 2. under the game lock: re-check, choose, apply or pass, advance
//! 3. publish events and persist the snapshot
//!
//! The token permit lives inside the task, so it is released however the
//! task ends: completion, error, shutdown or abort.
//!
//! ## Turn timers
//!
//! In timed games each human turn arms a timer tagged with the turn number.
//! On expiry the turn is forfeited only if the game is still on that turn.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{watch, OwnedSemaphorePermit};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::bot::BotEngine;
use crate::core::{EngineError, EngineResult, GameId, GameRng, GameState, PacingConfig};
use crate::rules::{self, PlacementDelta, TurnAdvance};

use super::events::{turn_events, EventSink, GameEvent};
use super::registry::{GameRegistry, LiveGame};
use super::store::GameRepository;

struct Shared {
    registry: Arc<GameRegistry>,
    repository: Arc<dyn GameRepository>,
    events: Arc<dyn EventSink>,
    engine: BotEngine,
    pacing: PacingConfig,
    pacing_rng: Mutex<GameRng>,
    shutdown: watch::Receiver<bool>,
}

/// Drives bot chains and turn timers for every game in a registry.
#[derive(Clone)]
pub struct BotScheduler {
    shared: Arc<Shared>,
}

/// True when the game is in play and a bot holds the turn.
#[must_use]
pub fn bot_to_move(state: &GameState) -> bool {
    rules::current_player(state).is_some_and(|p| p.is_bot)
}

impl BotScheduler {
    #[must_use]
    pub fn new(
        registry: Arc<GameRegistry>,
        repository: Arc<dyn GameRepository>,
        events: Arc<dyn EventSink>,
        engine: BotEngine,
        pacing: PacingConfig,
        pacing_rng: GameRng,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry,
                repository,
                events,
                engine,
                pacing,
                pacing_rng: Mutex::new(pacing_rng),
                shutdown,
            }),
        }
    }

    fn is_shut_down(&self) -> bool {
        *self.shared.shutdown.borrow()
    }

    /// Start a bot chain for the game unless one is already running.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn trigger(&self, game_id: GameId) -> Option<JoinHandle<()>> {
        if self.is_shut_down() {
            return None;
        }
        let token = self.shared.registry.chain_token(game_id)?;
        let Ok(permit) = token.try_acquire_owned() else {
            debug!(game_id = %game_id, "bot chain already running");
            return None;
        };

        let this = self.clone();
        Some(tokio::spawn(async move {
            let mut permit = Some(permit);
            if let Err(err) = this.run_chain(game_id, &mut permit).await {
                error!(game_id = %game_id, error = %err, "bot chain failed");
                this.shared.events.publish(GameEvent::BotChainFailed {
                    game_id,
                    error: err.to_string(),
                });
            }
        }))
    }

    fn pacing_delay(&self) -> Duration {
        let jitter_ms = u64::try_from(self.shared.pacing.jitter.as_millis()).unwrap_or(u64::MAX);
        let extra = if jitter_ms == 0 {
            0
        } else {
            self.shared
                .pacing_rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .gen_millis(jitter_ms)
        };
        self.shared.pacing.base + Duration::from_millis(extra)
    }

    /// Wait out `delay` unless shutdown comes first. Returns false on
    /// shutdown or once the service is gone.
    async fn pause(&self, delay: Duration) -> bool {
        let mut shutdown = self.shared.shutdown.clone();
        if !delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                closed = async { shutdown.wait_for(|stop| *stop).await.is_err() } => {
                    if closed {
                        return false;
                    }
                }
            }
        }
        let stopped = *shutdown.borrow();
        !stopped
    }

    /// Play bot turns until a human seat or the end of the game.
    ///
    /// On a normal exit the permit is released while the game lock is
    /// still held, so a trigger issued after the next human move always
    /// finds the token free.
    async fn run_chain(
        &self,
        game_id: GameId,
        permit: &mut Option<OwnedSemaphorePermit>,
    ) -> EngineResult<()> {
        let game = self
            .shared
            .registry
            .get(game_id)
            .ok_or_else(|| EngineError::not_found(format!("{game_id}")))?;
        let mut moves = 0u32;

        loop {
            {
                let live = game.lock().await;
                if !bot_to_move(&live.state) {
                    permit.take();
                    break;
                }
            }
            if !self.pause(self.pacing_delay()).await {
                info!(game_id = %game_id, moves, "bot chain stopped by shutdown");
                return Ok(());
            }

            let mut live = game.lock().await;
            if !bot_to_move(&live.state) {
                permit.take();
                break;
            }
            let LiveGame { state, rng } = &mut *live;
            let turn = self.shared.engine.play_turn(state, rng)?;
            moves += 1;
            self.after_turn(game_id, state, turn.placed.as_ref(), true, &turn.advance)?;
        }

        debug!(game_id = %game_id, moves, "bot chain finished");
        Ok(())
    }

    /// Publish, persist and re-arm the turn timer after a completed turn.
    /// A game that just finished is evicted once saved.
    ///
    /// Called with the game lock held.
    pub(crate) fn after_turn(
        &self,
        game_id: GameId,
        state: &GameState,
        placed: Option<&PlacementDelta>,
        by_bot: bool,
        advance: &TurnAdvance,
    ) -> EngineResult<()> {
        for event in turn_events(game_id, state, placed, by_bot, advance) {
            self.shared.events.publish(event);
        }
        self.arm_for_current_turn(game_id, state);
        self.shared.repository.save(game_id, state)?;
        if state.is_finished() {
            self.retire(game_id);
        }
        Ok(())
    }

    /// Drop a finished, persisted game from the live registry. Later reads
    /// restore it from the repository.
    pub(crate) fn retire(&self, game_id: GameId) {
        if self.shared.registry.remove(game_id) {
            debug!(game_id = %game_id, "finished game evicted");
        }
    }

    /// Arm a timer if the current seat is a human in a timed game,
    /// otherwise clear any armed timer.
    pub(crate) fn arm_for_current_turn(&self, game_id: GameId, state: &GameState) {
        match (state.config.turn_timeout, rules::current_player(state)) {
            (Some(timeout), Some(slot)) if !slot.is_bot && !self.is_shut_down() => {
                self.arm_timer(game_id, state.turn_number, timeout);
            }
            _ => self.shared.registry.cancel_timer(game_id),
        }
    }

    fn arm_timer(&self, game_id: GameId, turn_number: u64, timeout: Duration) {
        let this = self.clone();
        let handle = tokio::spawn(async move {
            if this.pause(timeout).await {
                this.expire_turn(game_id, turn_number).await;
            }
        });
        self.shared.registry.replace_timer(game_id, handle.abort_handle());
    }

    async fn expire_turn(&self, game_id: GameId, turn_number: u64) {
        let Some(game) = self.shared.registry.get(game_id) else {
            return;
        };
        let next_is_bot = {
            let mut live = game.lock().await;
            let state = &mut live.state;
            if !state.is_playing() || state.turn_number != turn_number {
                return;
            }
            let color = state.seat_at_cursor().map(|p| p.color);
            warn!(
                game_id = %game_id,
                color = ?color,
                turn = turn_number,
                "turn timed out, forfeiting"
            );
            let advance = match rules::advance_turn(state) {
                Ok(advance) => advance,
                Err(err) => {
                    error!(game_id = %game_id, error = %err, "turn timeout could not advance");
                    return;
                }
            };
            if let Err(err) = self.after_turn(game_id, state, None, false, &advance) {
                error!(game_id = %game_id, error = %err, "failed to persist timed-out turn");
            }
            bot_to_move(state)
        };
        if next_is_bot {
            self.trigger(game_id);
        }
    }

    /// Abort every armed turn timer.
    pub(crate) fn cancel_timers(&self) {
        self.shared.registry.cancel_all_timers();
    }
}
