//! Bot move selection and turn execution.
//!
//! A bot turn is: generate candidates, score each, stable-sort best first,
//! then pick the best with probability `greedy_probability` or one of the
//! top `top_k` uniformly. All randomness flows through a caller-supplied
//! `GameRng`, so a fixed seed replays the same game.

use tracing::debug;

use crate::core::{EngineError, EngineResult, GameRng, GameState};
use crate::rules::{self, Placement, PlacementDelta, TurnAdvance};

use super::candidates;
use super::config::BotConfig;
use super::evaluator::evaluate;

/// A candidate with its heuristic score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredPlacement {
    pub placement: Placement,
    pub score: f64,
}

/// What one bot turn did.
#[derive(Clone, Debug, PartialEq)]
pub struct BotTurn {
    /// `None` when the bot had to pass.
    pub placed: Option<PlacementDelta>,
    pub advance: TurnAdvance,
}

/// Heuristic bot.
#[derive(Clone, Debug, Default)]
pub struct BotEngine {
    config: BotConfig,
}

impl BotEngine {
    #[must_use]
    pub fn new(config: BotConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Scored candidates for the current seat, best first.
    ///
    /// Ties keep candidate generation order.
    #[must_use]
    pub fn ranked_candidates(&self, state: &GameState) -> Vec<ScoredPlacement> {
        let Some(slot) = rules::current_player(state) else {
            return Vec::new();
        };
        let color = slot.color;
        let generated = candidates::generate(&state.board, color, slot.remaining);
        let mut scored: Vec<ScoredPlacement> = generated
            .into_iter()
            .map(|placement| ScoredPlacement {
                placement,
                score: evaluate(&state.board, color, &placement, &self.config.weights),
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// Pick from a best-first list.
    pub fn select(&self, ranked: &[ScoredPlacement], rng: &mut GameRng) -> Option<ScoredPlacement> {
        if ranked.is_empty() {
            return None;
        }
        if rng.gen_bool(self.config.greedy_probability) {
            return Some(ranked[0]);
        }
        let pool = self.config.top_k.clamp(1, ranked.len());
        Some(ranked[rng.gen_index(pool)])
    }

    /// Choose a move for the current seat, which must be a bot.
    ///
    /// `Ok(None)` means the bot has no legal placement and must pass.
    pub fn choose_move(
        &self,
        state: &GameState,
        rng: &mut GameRng,
    ) -> EngineResult<Option<Placement>> {
        let slot = rules::current_player(state)
            .ok_or_else(|| EngineError::illegal_state("no current seat; game is not playing"))?;
        if !slot.is_bot {
            return Err(EngineError::illegal_state(format!(
                "current seat {} is not a bot",
                slot.color
            )));
        }
        let ranked = self.ranked_candidates(state);
        let chosen = self.select(&ranked, rng);
        if let Some(choice) = &chosen {
            debug!(
                color = %slot.color,
                candidates = ranked.len(),
                piece = choice.placement.piece.raw(),
                score = choice.score,
                "bot chose move"
            );
        }
        Ok(chosen.map(|c| c.placement))
    }

    /// Choose, apply (or pass) and advance, all through the rule engine.
    pub fn play_turn(&self, state: &mut GameState, rng: &mut GameRng) -> EngineResult<BotTurn> {
        let placed = match self.choose_move(state, rng)? {
            Some(placement) => {
                let color = rules::current_player(state)
                    .map(|p| p.color)
                    .ok_or_else(|| EngineError::illegal_state("current seat vanished"))?;
                Some(rules::apply(state, color, placement)?)
            }
            None => None,
        };
        let advance = rules::advance_turn(state)?;
        Ok(BotTurn { placed, advance })
    }
}
