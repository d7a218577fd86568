//! Configuration types.
//!
//! - `GameConfig`: per-game rules (scoring variant, optional turn timer)
//! - `PacingConfig`: delay between consecutive bot moves
//! - `ServiceConfig`: everything the game service needs at startup
//!
//! All configs are plain data with `Default` and `with_*` builders, and
//! round-trip through serde so they can be loaded from files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bot::BotConfig;

/// What a seat's base score counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreBasis {
    /// Number of cells placed (89 minus remaining cells).
    #[default]
    CellsPlaced,
    /// Negative count of cells still in hand.
    RemainingPenalty,
}

/// Scoring variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoringRule {
    pub basis: ScoreBasis,
    /// +15 for placing every piece, +5 more if the monomino went last.
    pub completion_bonus: bool,
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self {
            basis: ScoreBasis::CellsPlaced,
            completion_bonus: true,
        }
    }
}

impl ScoringRule {
    /// Rule-book scoring: penalty for cells left plus bonuses.
    #[must_use]
    pub fn official() -> Self {
        Self {
            basis: ScoreBasis::RemainingPenalty,
            completion_bonus: true,
        }
    }
}

/// Per-game rule configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub scoring: ScoringRule,

    /// Timed mode: a human seat that does not move within this window
    /// forfeits the turn. `None` disables the timer.
    pub turn_timeout: Option<Duration>,
}

impl GameConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringRule) -> Self {
        self.scoring = scoring;
        self
    }

    #[must_use]
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = Some(timeout);
        self
    }
}

/// Delay applied before each bot move so humans can follow along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Fixed part of the delay.
    pub base: Duration,
    /// Upper bound of the uniform random part added to `base`.
    pub jitter: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(2000),
            jitter: Duration::from_millis(1000),
        }
    }
}

impl PacingConfig {
    /// No delay at all. Used by tests and self-play.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            base: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }
}

/// Service-wide configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Defaults applied to games created without an explicit config.
    pub game: GameConfig,
    pub bot: BotConfig,
    pub pacing: PacingConfig,
}

impl ServiceConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    #[must_use]
    pub fn with_bot(mut self, bot: BotConfig) -> Self {
        self.bot = bot;
        self
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }
}
