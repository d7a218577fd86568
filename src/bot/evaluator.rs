//! Placement heuristic.
//!
//! Four terms, each weighted by `HeuristicWeights`:
//!
//! - **piece size**: cells in the piece
//! - **corner access**: 0.5 per (cell, diagonal) pair where the diagonal is
//!   on the board, empty and not part of the piece itself
//! - **board control**: `(1 - avg_dist / (20 / sqrt 2)) * 5`, distance of
//!   each cell from the center `(10, 10)`
//! - **blocking**: 1 per cell sharing an edge with an opponent's cell

use rustc_hash::FxHashSet;

use crate::board::Board;
use crate::core::{Color, Point, BOARD_SIZE};
use crate::rules::Placement;

use super::config::HeuristicWeights;

/// Raw (unweighted) heuristic terms for one placement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub piece_size: f64,
    pub corner_access: f64,
    pub board_control: f64,
    pub blocking: f64,
}

impl ScoreBreakdown {
    /// Weighted sum.
    #[must_use]
    pub fn total(&self, weights: &HeuristicWeights) -> f64 {
        self.piece_size * weights.piece_size
            + self.corner_access * weights.corner_access
            + self.board_control * weights.board_control
            + self.blocking * weights.blocking
    }
}

/// Evaluate `placement` for `color` on `board` (before it is applied).
#[must_use]
pub fn breakdown(board: &Board, color: Color, placement: &Placement) -> ScoreBreakdown {
    let cells: Vec<Point> = placement.orientation().cells_at(placement.origin()).collect();
    let own: FxHashSet<Point> = cells.iter().copied().collect();

    let corner_access = cells
        .iter()
        .flat_map(|c| c.diagonal_neighbors())
        .filter(|d| board.is_empty_at(*d) && !own.contains(d))
        .count() as f64
        * 0.5;

    let center = f64::from(BOARD_SIZE) / 2.0;
    let max_distance = f64::from(BOARD_SIZE) / std::f64::consts::SQRT_2;
    let avg_distance = cells
        .iter()
        .map(|c| (f64::from(c.x) - center).hypot(f64::from(c.y) - center))
        .sum::<f64>()
        / cells.len() as f64;
    let board_control = (1.0 - avg_distance / max_distance) * 5.0;

    let blocking = cells
        .iter()
        .filter(|c| board.occupied_neighbors4(c.x, c.y).contains_other_than(color))
        .count() as f64;

    ScoreBreakdown {
        piece_size: cells.len() as f64,
        corner_access,
        board_control,
        blocking,
    }
}

/// Weighted heuristic score. Higher is better.
#[must_use]
pub fn evaluate(
    board: &Board,
    color: Color,
    placement: &Placement,
    weights: &HeuristicWeights,
) -> f64 {
    breakdown(board, color, placement).total(weights)
}
