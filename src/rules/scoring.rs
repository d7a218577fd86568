//! Final scoring and match results.

use serde::{Deserialize, Serialize};

use crate::core::{Color, GameState, PieceId, PieceSet, PlayerSlot, ScoreBasis, ScoringRule};
use crate::pieces::{PieceCatalog, TOTAL_CELLS};

/// Bonus for placing all 21 pieces.
pub const COMPLETION_BONUS: i32 = 15;

/// Extra bonus when the final piece placed was the monomino.
pub const MONOMINO_LAST_BONUS: i32 = 5;

/// Result of a finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single highest score.
    Winner(Color),
    /// Every seat tied.
    Draw,
    /// Several seats share the highest score.
    Winners(Vec<Color>),
}

impl GameResult {
    /// Check if a color won (alone or shared).
    #[must_use]
    pub fn is_winner(&self, color: Color) -> bool {
        match self {
            GameResult::Winner(c) => *c == color,
            GameResult::Winners(cs) => cs.contains(&color),
            GameResult::Draw => false,
        }
    }
}

/// Sum of cell counts of the pieces in `pieces`.
#[must_use]
pub fn remaining_cells(pieces: PieceSet) -> u32 {
    let catalog = PieceCatalog::global();
    pieces.iter().map(|p| catalog.size(p) as u32).sum()
}

/// Score for one seat under `rule`.
#[must_use]
pub fn score_slot(slot: &PlayerSlot, rule: ScoringRule) -> i32 {
    let remaining = remaining_cells(slot.remaining) as i32;
    let mut score = match rule.basis {
        ScoreBasis::CellsPlaced => TOTAL_CELLS as i32 - remaining,
        ScoreBasis::RemainingPenalty => -remaining,
    };
    if rule.completion_bonus && slot.placed_all() {
        score += COMPLETION_BONUS;
        if slot.last_piece == Some(PieceId::MONOMINO) {
            score += MONOMINO_LAST_BONUS;
        }
    }
    score
}

/// Write final scores into every seat.
pub fn apply_scores(state: &mut GameState) {
    let rule = state.config.scoring;
    for slot in state.players.iter_mut() {
        slot.score = score_slot(slot, rule);
    }
}

/// Winner(s) by highest score. `None` for a game with no seats.
#[must_use]
pub fn result_of(players: &[PlayerSlot]) -> Option<GameResult> {
    let best = players.iter().map(|p| p.score).max()?;
    let top: Vec<Color> = players.iter().filter(|p| p.score == best).map(|p| p.color).collect();
    Some(match top.len() {
        1 => GameResult::Winner(top[0]),
        n if n == players.len() => GameResult::Draw,
        _ => GameResult::Winners(top),
    })
}
