//! Legal placement enumeration.
//!
//! Every legal placement covers at least one *anchor*: the start corner on a
//! color's first move, afterwards an empty cell diagonal to the color and
//! not edge-adjacent to it. Anchored search tries, for each anchor and each
//! cell of each orientation, the single origin that lands that cell on the
//! anchor. This is exhaustive and far cheaper than scanning every origin.
//!
//! `scan_placements` keeps the brute-force form for cross-checking and as
//! a fallback.

use rustc_hash::FxHashSet;

use crate::board::Board;
use crate::core::{Color, PieceSet, Point, BOARD_SIZE};
use crate::pieces::PieceCatalog;

use super::placement::{validate, Placement};

/// Cells a new piece of `color` could legally cover to gain contact.
#[must_use]
pub fn anchor_cells(board: &Board, color: Color) -> Vec<Point> {
    if !board.has_color(color) {
        let corner = color.start_corner();
        return if board.is_empty_at(corner) { vec![corner] } else { Vec::new() };
    }

    let mut seen = FxHashSet::default();
    let mut anchors = Vec::new();
    for cell in board.cells_of(color) {
        for d in cell.diagonal_neighbors() {
            if board.is_empty_at(d)
                && !board.occupied_neighbors4(d.x, d.y).contains(color)
                && seen.insert(d)
            {
                anchors.push(d);
            }
        }
    }
    anchors.sort_unstable();
    anchors
}

/// Visit every legal anchored placement, stopping early when `visit`
/// returns false.
fn for_each_anchored(
    board: &Board,
    color: Color,
    pieces: PieceSet,
    mut visit: impl FnMut(Placement) -> bool,
) {
    let anchors = anchor_cells(board, color);
    if anchors.is_empty() {
        return;
    }
    let catalog = PieceCatalog::global();
    let mut tried = FxHashSet::default();

    for piece in pieces.iter() {
        for (oi, orientation) in catalog.orientations_of(piece).iter().enumerate() {
            for &anchor in &anchors {
                for &cell in orientation.cells() {
                    let origin = Point::new(anchor.x - cell.x, anchor.y - cell.y);
                    if !tried.insert((piece, oi, origin)) {
                        continue;
                    }
                    if validate(board, color, orientation, origin.x, origin.y).is_ok() {
                        let placement =
                            Placement::new(piece, orientation.key(), origin.x, origin.y);
                        if !visit(placement) {
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// All legal placements for `color` using only `pieces`, found from anchors.
///
/// Order is deterministic: piece id, then orientation, then anchor.
#[must_use]
pub fn anchored_placements(board: &Board, color: Color, pieces: PieceSet) -> Vec<Placement> {
    let mut out = Vec::new();
    for_each_anchored(board, color, pieces, |p| {
        out.push(p);
        true
    });
    out
}

/// All legal placements found by trying every origin on the board.
#[must_use]
pub fn scan_placements(board: &Board, color: Color, pieces: PieceSet) -> Vec<Placement> {
    let catalog = PieceCatalog::global();
    let mut out = Vec::new();
    for piece in pieces.iter() {
        for orientation in catalog.orientations_of(piece) {
            for y in 0..=BOARD_SIZE - orientation.height() {
                for x in 0..=BOARD_SIZE - orientation.width() {
                    if validate(board, color, orientation, x, y).is_ok() {
                        out.push(Placement::new(piece, orientation.key(), x, y));
                    }
                }
            }
        }
    }
    out
}

/// Whether `color` has at least one legal placement with `pieces`.
#[must_use]
pub fn has_legal_placement(board: &Board, color: Color, pieces: PieceSet) -> bool {
    if pieces.is_empty() {
        return false;
    }
    let mut found = false;
    for_each_anchored(board, color, pieces, |_| {
        found = true;
        false
    });
    found
}
