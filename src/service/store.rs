//! Game persistence boundary.
//!
//! The engine decides what a snapshot contains; a `GameRepository` decides
//! where it lives. `InMemoryRepository` keeps bincode-encoded snapshots so
//! that stored games are independent copies of the live state.

use std::sync::{Mutex, PoisonError};

use rustc_hash::FxHashMap;

use crate::core::{EngineError, EngineResult, GameId, GameState};

/// Load and save game snapshots.
pub trait GameRepository: Send + Sync {
    /// The last saved snapshot, if any.
    fn load(&self, game_id: GameId) -> EngineResult<Option<GameState>>;

    /// Replace the stored snapshot.
    fn save(&self, game_id: GameId, state: &GameState) -> EngineResult<()>;

    /// Highest id with a stored snapshot.
    fn max_id(&self) -> EngineResult<Option<GameId>>;
}

/// Process-local repository.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    snapshots: Mutex<FxHashMap<GameId, Vec<u8>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GameRepository for InMemoryRepository {
    fn load(&self, game_id: GameId) -> EngineResult<Option<GameState>> {
        let snapshots = self.snapshots.lock().unwrap_or_else(PoisonError::into_inner);
        snapshots
            .get(&game_id)
            .map(|bytes| {
                bincode::deserialize(bytes).map_err(|e| EngineError::Storage {
                    message: format!("decode {game_id}: {e}"),
                })
            })
            .transpose()
    }

    fn save(&self, game_id: GameId, state: &GameState) -> EngineResult<()> {
        let bytes = bincode::serialize(state).map_err(|e| EngineError::Storage {
            message: format!("encode {game_id}: {e}"),
        })?;
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(game_id, bytes);
        Ok(())
    }

    fn max_id(&self) -> EngineResult<Option<GameId>> {
        let snapshots = self.snapshots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(snapshots.keys().copied().max())
    }
}
