//! Live games and their per-game locks.
//!
//! Each game owns:
//! - a state lock (`tokio::sync::Mutex`) guarding validate, apply and
//!   advance for every caller
//! - a chain token, a one-permit semaphore held for the whole life of a
//!   bot chain
//! - at most one armed turn timer
//!
//! The registry's own map is behind a `std::sync::Mutex` that is only held
//! for lookups and inserts, never across an `.await`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rustc_hash::FxHashMap;
use tokio::sync::Semaphore;
use tokio::task::AbortHandle;

use crate::core::{GameId, GameRng, GameState};

/// A game plus the random stream its bots draw from.
#[derive(Debug)]
pub struct LiveGame {
    pub state: GameState,
    pub rng: GameRng,
}

/// Shared handle to a game's state lock.
pub type GameHandle = Arc<tokio::sync::Mutex<LiveGame>>;

/// Single-permit token that at most one bot chain per game may hold.
pub type ChainToken = Arc<Semaphore>;

struct Entry {
    game: GameHandle,
    chain: ChainToken,
    timer: Option<AbortHandle>,
}

/// All games known to the process.
pub struct GameRegistry {
    games: Mutex<FxHashMap<GameId, Entry>>,
    next_id: AtomicU64,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            games: Mutex::new(FxHashMap::default()),
            next_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FxHashMap<GameId, Entry>> {
        self.games.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A fresh, never-used game id.
    pub fn allocate_id(&self) -> GameId {
        GameId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a game, returning its state handle. An existing entry for
    /// the same id is kept and its handle returned instead.
    pub fn insert(&self, game_id: GameId, game: LiveGame) -> GameHandle {
        let mut games = self.lock();
        let entry = games.entry(game_id).or_insert_with(|| Entry {
            game: Arc::new(tokio::sync::Mutex::new(game)),
            chain: Arc::new(Semaphore::new(1)),
            timer: None,
        });
        let game = Arc::clone(&entry.game);
        drop(games);
        self.reserve_through(game_id);
        game
    }

    /// Make sure `allocate_id` never hands out `game_id` or anything below.
    pub fn reserve_through(&self, game_id: GameId) {
        self.next_id.fetch_max(game_id.raw() + 1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn get(&self, game_id: GameId) -> Option<GameHandle> {
        self.lock().get(&game_id).map(|e| Arc::clone(&e.game))
    }

    /// The game's chain token, if the game is registered.
    #[must_use]
    pub fn chain_token(&self, game_id: GameId) -> Option<ChainToken> {
        self.lock().get(&game_id).map(|e| Arc::clone(&e.chain))
    }

    /// Whether a bot chain currently holds the game's token.
    #[must_use]
    pub fn is_chain_running(&self, game_id: GameId) -> bool {
        self.chain_token(game_id)
            .is_some_and(|token| token.available_permits() == 0)
    }

    /// Install a turn timer, aborting the one it replaces.
    pub fn replace_timer(&self, game_id: GameId, timer: AbortHandle) {
        let mut games = self.lock();
        match games.get_mut(&game_id) {
            Some(entry) => {
                if let Some(old) = entry.timer.replace(timer) {
                    old.abort();
                }
            }
            None => timer.abort(),
        }
    }

    /// Abort the game's turn timer, if any.
    pub fn cancel_timer(&self, game_id: GameId) {
        if let Some(entry) = self.lock().get_mut(&game_id) {
            if let Some(old) = entry.timer.take() {
                old.abort();
            }
        }
    }

    /// Abort every armed timer.
    pub fn cancel_all_timers(&self) {
        for entry in self.lock().values_mut() {
            if let Some(old) = entry.timer.take() {
                old.abort();
            }
        }
    }

    /// Forget a game. Its handle stays valid for holders of clones.
    pub fn remove(&self, game_id: GameId) -> bool {
        match self.lock().remove(&game_id) {
            Some(entry) => {
                if let Some(timer) = entry.timer {
                    timer.abort();
                }
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<GameId> {
        let mut ids: Vec<_> = self.lock().keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
