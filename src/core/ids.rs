//! Identifiers and board coordinates.
//!
//! ## GameId
//!
//! Opaque handle for one match. Allocated by the service layer; the rules
//! never interpret it.
//!
//! ## PieceId
//!
//! Stable identifier of one of the 21 catalog shapes, valid range `1..=21`.
//!
//! ```
//! use rust_blokus::core::PieceId;
//!
//! let monomino = PieceId::new(1).unwrap();
//! assert_eq!(monomino.raw(), 1);
//! assert!(PieceId::new(0).is_err());
//! assert!(PieceId::new(22).is_err());
//! ```

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};

/// Identifier for a single game instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl GameId {
    /// Create a new game ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game({})", self.0)
    }
}

/// Catalog piece identifier (1-21).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(u8);

impl PieceId {
    /// Smallest valid piece id (the monomino).
    pub const MIN: u8 = 1;

    /// Largest valid piece id.
    pub const MAX: u8 = 21;

    /// The single-cell piece. Placing it last earns the monomino bonus.
    pub const MONOMINO: PieceId = PieceId(1);

    /// Create a piece ID, failing with `NotFound` outside `1..=21`.
    pub fn new(id: u8) -> EngineResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&id) {
            Ok(Self(id))
        } else {
            Err(EngineError::NotFound {
                what: format!("piece {id}"),
            })
        }
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Zero-based index into catalog tables.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Iterate over all 21 piece ids in catalog order.
    pub fn all() -> impl Iterator<Item = PieceId> {
        (Self::MIN..=Self::MAX).map(PieceId)
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Piece({})", self.0)
    }
}

/// A board coordinate or a cell offset inside a piece.
///
/// `x` is the column and `y` the row; `y` grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by another point used as an offset.
    #[must_use]
    pub const fn offset(self, by: Point) -> Self {
        Self {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }

    /// The four edge-adjacent neighbors.
    #[must_use]
    pub const fn edge_neighbors(self) -> [Point; 4] {
        [
            Point::new(self.x, self.y - 1),
            Point::new(self.x + 1, self.y),
            Point::new(self.x, self.y + 1),
            Point::new(self.x - 1, self.y),
        ]
    }

    /// The four diagonal-only neighbors.
    #[must_use]
    pub const fn diagonal_neighbors(self) -> [Point; 4] {
        [
            Point::new(self.x - 1, self.y - 1),
            Point::new(self.x + 1, self.y - 1),
            Point::new(self.x - 1, self.y + 1),
            Point::new(self.x + 1, self.y + 1),
        ]
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
