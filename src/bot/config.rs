//! Bot configuration parameters.

use serde::{Deserialize, Serialize};

/// Weights of the placement heuristic terms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeuristicWeights {
    /// Per cell of the placed piece. Favors shedding large pieces early.
    pub piece_size: f64,

    /// Per unit of new diagonal expansion room.
    pub corner_access: f64,

    /// Per unit of closeness to the board center.
    pub board_control: f64,

    /// Per cell that presses against an opponent.
    pub blocking: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            piece_size: 1.5,
            corner_access: 2.0,
            board_control: 1.0,
            blocking: 1.2,
        }
    }
}

/// Bot configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    pub weights: HeuristicWeights,

    /// Probability of taking the best-scored candidate outright.
    /// Otherwise one of the top `top_k` is picked uniformly.
    pub greedy_probability: f64,

    /// Size of the pool for the non-greedy pick.
    pub top_k: usize,

    /// Random seed for selection. `None` seeds from OS entropy.
    /// Same seed produces identical bot games.
    pub seed: Option<u64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            weights: HeuristicWeights::default(),
            greedy_probability: 0.8,
            top_k: 3,
            seed: None,
        }
    }
}

impl BotConfig {
    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Create a new config with custom heuristic weights.
    #[must_use]
    pub fn with_weights(mut self, weights: HeuristicWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Create a new config with custom greedy probability.
    #[must_use]
    pub fn with_greedy_probability(mut self, probability: f64) -> Self {
        self.greedy_probability = probability;
        self
    }

    /// Create a new config with custom top-k pool size (at least 1).
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert!((config.greedy_probability - 0.8).abs() < 1e-9);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.seed, None);
        assert_eq!(config.weights.corner_access, 2.0);
        assert_eq!(config.weights.blocking, 1.2);
    }

    #[test]
    fn test_builder_pattern() {
        let config = BotConfig::default()
            .with_seed(123)
            .with_greedy_probability(1.0)
            .with_top_k(0);

        assert_eq!(config.seed, Some(123));
        assert_eq!(config.greedy_probability, 1.0);
        assert_eq!(config.top_k, 1);
    }

    #[test]
    fn test_serialization() {
        let config = BotConfig::default().with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: BotConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
