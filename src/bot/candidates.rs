//! Candidate generation for a bot seat.

use tracing::warn;

use crate::board::Board;
use crate::core::{Color, PieceSet};
use crate::rules::{anchored_placements, scan_placements, Placement};

/// Legal placements for `color`.
///
/// Anchored search covers every legal placement; the full-board scan only
/// runs if it comes back empty while pieces remain, and is logged because
/// it should never find anything the anchored pass missed.
#[must_use]
pub fn generate(board: &Board, color: Color, pieces: PieceSet) -> Vec<Placement> {
    if pieces.is_empty() {
        return Vec::new();
    }
    let anchored = anchored_placements(board, color, pieces);
    if !anchored.is_empty() {
        return anchored;
    }

    let scanned = scan_placements(board, color, pieces);
    if !scanned.is_empty() {
        warn!(
            color = %color,
            found = scanned.len(),
            "anchored search found nothing, board scan did"
        );
    }
    scanned
}
