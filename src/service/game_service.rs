//! Async façade over the rules, bot scheduler and collaborators.
//!
//! Every mutating call takes the game's state lock around validate, apply
//! and advance, so human moves, bot moves, timer expiries and admin calls
//! are strictly sequential within a game. Games not in the live registry
//! are loaded from the repository on first use.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::bot::BotEngine;
use crate::core::{
    Color, ColorMap, EngineError, EngineResult, GameConfig, GameId, GameRng, GameState, PieceId,
    PlacedMove, PlayerSlot, ServiceConfig,
};
use crate::pieces::OrientationKey;
use crate::rules::{self, Placement, PlacementDelta};

use super::events::{game_over, EventSink, GameEvent, NullSink};
use super::registry::{GameHandle, GameRegistry, LiveGame};
use super::scheduler::{bot_to_move, BotScheduler};
use super::store::{GameRepository, InMemoryRepository};

/// Seats and rules for a new game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSetup {
    /// Seats in turn order. Missing colors become bots at start.
    pub seats: Vec<PlayerSlot>,
    /// Overrides the service default.
    pub config: Option<GameConfig>,
}

impl GameSetup {
    #[must_use]
    pub fn new(seats: Vec<PlayerSlot>) -> Self {
        Self { seats, config: None }
    }

    /// Clockwise seating with the first `humans` seats human.
    #[must_use]
    pub fn standard(humans: usize) -> Self {
        Self::new(PlayerSlot::standard_seats(humans))
    }

    #[must_use]
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = Some(config);
        self
    }
}

struct Inner {
    registry: Arc<GameRegistry>,
    repository: Arc<dyn GameRepository>,
    events: Arc<dyn EventSink>,
    scheduler: BotScheduler,
    default_game: GameConfig,
    seeds: GameRng,
    shutdown: watch::Sender<bool>,
}

/// Cheaply cloneable handle to the game service.
#[derive(Clone)]
pub struct GameService {
    inner: Arc<Inner>,
}

impl GameService {
    /// Service with an in-memory repository and no event delivery.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_collaborators(config, Arc::new(InMemoryRepository::new()), Arc::new(NullSink))
    }

    /// Service with caller-supplied persistence and event delivery.
    #[must_use]
    pub fn with_collaborators(
        config: ServiceConfig,
        repository: Arc<dyn GameRepository>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let mut seeds = match config.bot.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        let pacing_rng = seeds.fork();
        let registry = Arc::new(GameRegistry::new());
        let (shutdown, shutdown_rx) = watch::channel(false);
        let scheduler = BotScheduler::new(
            Arc::clone(&registry),
            Arc::clone(&repository),
            Arc::clone(&events),
            BotEngine::new(config.bot.clone()),
            config.pacing,
            pacing_rng,
            shutdown_rx,
        );
        Self {
            inner: Arc::new(Inner {
                registry,
                repository,
                events,
                scheduler,
                default_game: config.game,
                seeds,
                shutdown,
            }),
        }
    }

    /// The live registry.
    #[must_use]
    pub fn registry(&self) -> &GameRegistry {
        &self.inner.registry
    }

    fn register(&self, game_id: GameId, state: GameState) -> GameHandle {
        let rng = self.inner.seeds.for_game(game_id);
        self.inner.registry.insert(game_id, LiveGame { state, rng })
    }

    /// Live handle, loading from the repository if needed.
    fn game(&self, game_id: GameId) -> EngineResult<GameHandle> {
        if let Some(handle) = self.inner.registry.get(game_id) {
            return Ok(handle);
        }
        let state = self
            .inner
            .repository
            .load(game_id)?
            .ok_or_else(|| EngineError::not_found(format!("{game_id}")))?;
        info!(game_id = %game_id, "game restored from repository");
        Ok(self.register(game_id, state))
    }

    fn persist(&self, game_id: GameId, state: &GameState) {
        if let Err(err) = self.inner.repository.save(game_id, state) {
            warn!(game_id = %game_id, error = %err, "failed to persist game");
        }
    }

    /// Register a new waiting game.
    pub async fn create_game(&self, setup: GameSetup) -> EngineResult<GameId> {
        for (i, seat) in setup.seats.iter().enumerate() {
            if setup.seats[..i].iter().any(|s| s.color == seat.color) {
                return Err(EngineError::InvalidArgument {
                    message: format!("color {} seated twice", seat.color),
                });
            }
        }
        let config = setup.config.unwrap_or_else(|| self.inner.default_game.clone());
        let state = GameState::new(setup.seats, config);
        // Stored games from an earlier process keep their ids.
        if let Some(stored) = self.inner.repository.max_id()? {
            self.inner.registry.reserve_through(stored);
        }
        let game_id = self.inner.registry.allocate_id();
        self.persist(game_id, &state);
        self.register(game_id, state);
        info!(game_id = %game_id, "game created");
        Ok(game_id)
    }

    /// Backfill bots and begin play. Returns the first seat.
    pub async fn start_game(&self, game_id: GameId) -> EngineResult<Option<PlayerSlot>> {
        let game = self.game(game_id)?;
        let (first, bot_first) = {
            let mut live = game.lock().await;
            rules::start(&mut live.state)?;
            let first = rules::current_player(&live.state).cloned();
            if let Some(slot) = &first {
                self.inner.events.publish(GameEvent::TurnAdvanced {
                    game_id,
                    next: slot.color,
                    turn_number: live.state.turn_number,
                });
            }
            self.inner.scheduler.arm_for_current_turn(game_id, &live.state);
            self.persist(game_id, &live.state);
            (first, bot_to_move(&live.state))
        };
        if bot_first {
            self.trigger_bot_chain(game_id);
        }
        Ok(first)
    }

    /// Place a piece for the current human (or any) seat and advance.
    ///
    /// Triggers a bot chain when the next seat is a bot.
    #[allow(clippy::too_many_arguments)]
    pub async fn place_piece(
        &self,
        game_id: GameId,
        color: Color,
        piece_id: u8,
        x: i32,
        y: i32,
        rotation: u8,
        flipped: bool,
    ) -> EngineResult<PlacementDelta> {
        let piece = PieceId::new(piece_id)?;
        let key = OrientationKey::new(rotation, flipped)?;
        let game = self.game(game_id)?;

        let (delta, next_is_bot) = {
            let mut live = game.lock().await;
            let state = &mut live.state;
            let delta = rules::apply(state, color, Placement::new(piece, key, x, y))?;
            let advance = rules::advance_turn(state)?;
            if let Err(err) = self
                .inner
                .scheduler
                .after_turn(game_id, state, Some(&delta), false, &advance)
            {
                warn!(game_id = %game_id, error = %err, "failed to persist game");
            }
            (delta, bot_to_move(state))
        };

        if next_is_bot {
            self.trigger_bot_chain(game_id);
        }
        Ok(delta)
    }

    pub async fn current_player(&self, game_id: GameId) -> EngineResult<Option<PlayerSlot>> {
        let game = self.game(game_id)?;
        let live = game.lock().await;
        Ok(rules::current_player(&live.state).cloned())
    }

    /// Force the turn to move on (the current seat passes if it has not
    /// placed). Returns the new current seat.
    pub async fn advance_turn(&self, game_id: GameId) -> EngineResult<Option<PlayerSlot>> {
        let game = self.game(game_id)?;
        let (next, next_is_bot) = {
            let mut live = game.lock().await;
            let state = &mut live.state;
            let advance = rules::advance_turn(state)?;
            if let Err(err) = self
                .inner
                .scheduler
                .after_turn(game_id, state, None, false, &advance)
            {
                warn!(game_id = %game_id, error = %err, "failed to persist game");
            }
            (rules::current_player(state).cloned(), bot_to_move(state))
        };
        if next_is_bot {
            self.trigger_bot_chain(game_id);
        }
        Ok(next)
    }

    pub async fn can_player_move(&self, game_id: GameId, color: Color) -> EngineResult<bool> {
        let game = self.game(game_id)?;
        let live = game.lock().await;
        Ok(rules::can_player_move(&live.state, color))
    }

    pub async fn is_game_over(&self, game_id: GameId) -> EngineResult<bool> {
        let game = self.game(game_id)?;
        let live = game.lock().await;
        Ok(rules::is_game_over(&live.state))
    }

    /// Final scores. Finishes a game that has no moves left.
    pub async fn finalize_scores(&self, game_id: GameId) -> EngineResult<ColorMap<i32>> {
        let game = self.game(game_id)?;
        let mut live = game.lock().await;
        let was_finished = live.state.is_finished();
        let scores = rules::finalize_scores(&mut live.state)?;
        if !was_finished {
            self.inner.events.publish(game_over(game_id, &live.state));
            self.inner.registry.cancel_timer(game_id);
            match self.inner.repository.save(game_id, &live.state) {
                Ok(()) => self.inner.scheduler.retire(game_id),
                Err(err) => warn!(game_id = %game_id, error = %err, "failed to persist game"),
            }
        }
        Ok(scores)
    }

    /// Every placement so far, in play order.
    pub async fn placed_moves(&self, game_id: GameId) -> EngineResult<Vec<PlacedMove>> {
        let game = self.game(game_id)?;
        let live = game.lock().await;
        Ok(live.state.history.iter().copied().collect())
    }

    /// Copy of the full state.
    pub async fn snapshot(&self, game_id: GameId) -> EngineResult<GameState> {
        let game = self.game(game_id)?;
        let live = game.lock().await;
        Ok(live.state.clone())
    }

    /// Start a bot chain unless one is already running for this game.
    ///
    /// `None` means the trigger was a no-op: unknown game, chain already
    /// running, or service shut down.
    pub fn trigger_bot_chain(&self, game_id: GameId) -> Option<JoinHandle<()>> {
        if self.inner.registry.get(game_id).is_none() {
            self.game(game_id).ok()?;
        }
        self.inner.scheduler.trigger(game_id)
    }

    /// Stop chains at their next pause and cancel all turn timers.
    pub fn shutdown(&self) {
        info!("game service shutting down");
        self.inner.shutdown.send_replace(true);
        self.inner.scheduler.cancel_timers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameStatus, PacingConfig};

    fn service() -> GameService {
        GameService::new(ServiceConfig::new().with_pacing(PacingConfig::immediate()))
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_colors() {
        let svc = service();
        let err = svc
            .create_game(GameSetup::new(vec![
                PlayerSlot::human(Color::Red),
                PlayerSlot::bot(Color::Red),
            ]))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument { .. }));
    }

    #[test]
    fn test_standard_setup_matches_standard_state() {
        let setup = GameSetup::standard(2);
        let state = GameState::standard(2, GameConfig::default());
        assert_eq!(setup.seats, state.players);
    }

    #[tokio::test]
    async fn test_unknown_game() {
        let svc = service();
        let err = svc.snapshot(GameId::new(77)).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
        assert!(svc.trigger_bot_chain(GameId::new(77)).is_none());
    }

    #[tokio::test]
    async fn test_waiting_game_has_no_current_player() {
        let svc = service();
        let id = svc.create_game(GameSetup::standard(4)).await.unwrap();
        assert_eq!(svc.current_player(id).await.unwrap(), None);
        assert_eq!(svc.snapshot(id).await.unwrap().status, GameStatus::Waiting);
    }

    #[tokio::test]
    async fn test_invalid_piece_and_rotation() {
        let svc = service();
        let id = svc.create_game(GameSetup::standard(4)).await.unwrap();
        svc.start_game(id).await.unwrap();
        let err = svc.place_piece(id, Color::Blue, 0, 0, 0, 0, false).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
        let err = svc.place_piece(id, Color::Blue, 1, 0, 0, 4, false).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument { .. }));
    }
}
