//! Error types for the engine.
//!
//! Rejected moves are recoverable refusals: the game state is untouched and
//! the caller may try again. Everything else is scoped to one request or one
//! game; nothing here is fatal to the process.

use serde::{Deserialize, Serialize};

/// Why a placement was refused by the rule engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum RejectReason {
    /// A transformed cell lies outside the 20x20 board.
    #[error("piece extends outside the board")]
    OutOfBounds,

    /// A transformed cell is already occupied.
    #[error("piece overlaps an occupied cell")]
    Overlap,

    /// First placement of a color does not cover its starting corner.
    #[error("first piece must cover the starting corner")]
    MustCoverStartCorner,

    /// A cell would share an edge with the same color.
    #[error("piece touches its own color along an edge")]
    EdgeTouchSameColor,

    /// No cell touches the same color at a corner.
    #[error("piece has no corner contact with its own color")]
    NoCornerContact,

    /// The piece was already placed by this color.
    #[error("piece is not available to this player")]
    PieceUnavailable,
}

/// Errors that can occur in engine operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Placement refused by the rule engine. Game state unchanged.
    #[error("move rejected: {0}")]
    Rejected(#[from] RejectReason),

    /// Unknown game or piece id.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Operation attempted against the wrong game status or seat.
    #[error("illegal state: {message}")]
    IllegalState { message: String },

    /// Board coordinate query outside the grid.
    #[error("coordinate ({x}, {y}) is out of range")]
    OutOfRange { x: i32, y: i32 },

    /// Malformed request parameter.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Snapshot could not be encoded or decoded by a repository.
    #[error("storage failure: {message}")]
    Storage { message: String },
}

impl EngineError {
    pub(crate) fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// The reject reason, if this error is a refused move.
    #[must_use]
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Self::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
