//! Placement validation and application.
//!
//! The same code path serves human and bot moves: `validate` is a pure
//! check against a board, `apply` re-validates against the live state and
//! commits atomically.
//!
//! ## Rules (checked in order)
//!
//! 1. Every cell on the board
//! 2. No cell already owned
//! 3. First piece of a color covers that color's start corner
//! 4. Later pieces never share an edge with their own color
//! 5. Later pieces touch their own color at a corner

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::core::{
    Color, EngineError, EngineResult, GameState, PieceId, PlacedMove, Point, RejectReason,
};
use crate::pieces::{Orientation, OrientationKey, PieceCatalog};

/// A requested placement: which piece, how it is turned, where its origin
/// lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub piece: PieceId,
    pub key: OrientationKey,
    pub x: i32,
    pub y: i32,
}

impl Placement {
    #[must_use]
    pub fn new(piece: PieceId, key: OrientationKey, x: i32, y: i32) -> Self {
        Self { piece, key, x, y }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The catalog orientation this placement refers to.
    #[must_use]
    pub fn orientation(&self) -> &'static Orientation {
        PieceCatalog::global().orientation(self.piece, self.key)
    }
}

/// What a committed placement changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementDelta {
    pub color: Color,
    pub piece: PieceId,
    pub key: OrientationKey,
    pub origin: Point,
    /// Board cells written, in orientation order.
    pub cells: Vec<Point>,
}

/// Check a placement against the board without touching it.
pub fn validate(
    board: &Board,
    color: Color,
    orientation: &Orientation,
    x: i32,
    y: i32,
) -> Result<(), RejectReason> {
    let origin = Point::new(x, y);

    if orientation.cells_at(origin).any(|p| !board.contains(p)) {
        return Err(RejectReason::OutOfBounds);
    }
    if orientation.cells_at(origin).any(|p| board.get(p).is_some()) {
        return Err(RejectReason::Overlap);
    }

    if !board.has_color(color) {
        let corner = color.start_corner();
        let covering = orientation.cells_at(origin).filter(|&p| p == corner).count();
        return if covering == 1 {
            Ok(())
        } else {
            Err(RejectReason::MustCoverStartCorner)
        };
    }

    if orientation
        .cells_at(origin)
        .any(|p| board.occupied_neighbors4(p.x, p.y).contains(color))
    {
        return Err(RejectReason::EdgeTouchSameColor);
    }
    if !orientation
        .cells_at(origin)
        .any(|p| board.occupied_diagonal_neighbors(p.x, p.y).contains(color))
    {
        return Err(RejectReason::NoCornerContact);
    }

    Ok(())
}

/// Validate and commit a placement for `color`.
///
/// The mover must be the current seat of a playing game and must not have
/// placed already this turn. On any error the state is unchanged.
pub fn apply(
    state: &mut GameState,
    color: Color,
    placement: Placement,
) -> EngineResult<PlacementDelta> {
    if !state.is_playing() {
        return Err(EngineError::illegal_state(format!(
            "cannot place while game is {:?}",
            state.status
        )));
    }
    let current = state
        .seat_at_cursor()
        .map(|p| p.color)
        .ok_or_else(|| EngineError::illegal_state("no seat under the turn cursor"))?;
    if current != color {
        return Err(EngineError::illegal_state(format!(
            "it is {current}'s turn, not {color}'s"
        )));
    }
    if state.placed_this_turn {
        return Err(EngineError::illegal_state(format!("{color} already placed this turn")));
    }

    let slot = state
        .player(color)
        .ok_or_else(|| EngineError::not_found(format!("seat {color}")))?;
    if !slot.remaining.contains(placement.piece) {
        return Err(RejectReason::PieceUnavailable.into());
    }

    let orientation = placement.orientation();
    validate(&state.board, color, orientation, placement.x, placement.y)?;

    state.board.apply(orientation, placement.x, placement.y, color);
    if let Some(slot) = state.player_mut(color) {
        slot.remaining.remove(placement.piece);
        slot.last_piece = Some(placement.piece);
    }
    state.history.push_back(PlacedMove {
        color,
        piece: placement.piece,
        x: placement.x,
        y: placement.y,
        orientation: placement.key,
    });
    state.consecutive_passes = 0;
    state.placed_this_turn = true;

    let delta = PlacementDelta {
        color,
        piece: placement.piece,
        key: placement.key,
        origin: placement.origin(),
        cells: orientation.cells_at(placement.origin()).collect(),
    };
    debug!(
        color = %color,
        piece = placement.piece.raw(),
        x = placement.x,
        y = placement.y,
        key = %placement.key,
        "piece placed"
    );
    Ok(delta)
}
