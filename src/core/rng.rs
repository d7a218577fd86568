//! Deterministic random number generation for bot play.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Per-game streams**: Each game draws from its own stream derived from
//!   the service seed and the game id, so one game's bots never perturb
//!   another's
//!
//! ```
//! use rust_blokus::core::{GameId, GameRng};
//!
//! let master = GameRng::new(42);
//! let mut a = master.for_game(GameId::new(1));
//! let mut b = master.for_game(GameId::new(1));
//! assert_eq!(a.gen_index(100), b.gen_index(100));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::ids::GameId;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic ChaCha8-backed RNG.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Create an RNG seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = mix(self.seed.wrapping_add(self.fork_counter.wrapping_mul(GOLDEN_GAMMA)));
        Self::new(fork_seed)
    }

    /// Independent stream for one game.
    ///
    /// Depends only on this RNG's seed and the game id, not on how many
    /// numbers have been drawn.
    #[must_use]
    pub fn for_game(&self, game_id: GameId) -> Self {
        Self::new(mix(self.seed ^ game_id.raw().wrapping_mul(GOLDEN_GAMMA)))
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn gen_index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Uniform duration in milliseconds in `0..=max_ms`.
    pub fn gen_millis(&mut self, max_ms: u64) -> u64 {
        self.inner.gen_range(0..=max_ms)
    }

    /// Generate a random boolean with given probability of true.
    ///
    /// The probability is clamped to `[0, 1]`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// SplitMix64 finalizer.
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
