//! Rotations and reflections of a shape.
//!
//! A key is applied as: optional horizontal flip (`x -> -x`) first, then
//! `rotation` clockwise quarter turns (`(x, y) -> (-y, x)` with `y` pointing
//! down), then re-normalization.

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, EngineResult, Point};

use super::shape::{normalize, Cells};

/// Identifies one of the eight rigid transforms of a shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrientationKey {
    /// Clockwise quarter turns, 0..=3.
    pub rotation: u8,
    /// Mirror horizontally before rotating.
    pub flipped: bool,
}

impl OrientationKey {
    /// The untransformed shape.
    pub const IDENTITY: OrientationKey = OrientationKey {
        rotation: 0,
        flipped: false,
    };

    /// Create a key, rejecting rotations outside `0..=3`.
    pub fn new(rotation: u8, flipped: bool) -> EngineResult<Self> {
        if rotation > 3 {
            return Err(EngineError::InvalidArgument {
                message: format!("rotation {rotation} outside 0..=3"),
            });
        }
        Ok(Self { rotation, flipped })
    }

    /// All eight keys: unflipped rotations 0..3, then flipped 0..3.
    pub fn all() -> impl Iterator<Item = OrientationKey> {
        [false, true]
            .into_iter()
            .flat_map(|flipped| (0..4).map(move |rotation| OrientationKey { rotation, flipped }))
    }

    /// Dense index 0..8, matching the order of [`OrientationKey::all`].
    #[must_use]
    pub const fn index(self) -> usize {
        self.rotation as usize + if self.flipped { 4 } else { 0 }
    }
}

impl std::fmt::Display for OrientationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}{}", self.rotation, if self.flipped { "f" } else { "" })
    }
}

/// A concrete transformed shape, ready to be stamped on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orientation {
    key: OrientationKey,
    cells: Cells,
    width: i32,
    height: i32,
}

impl Orientation {
    /// Transform canonical cells by `key`.
    #[must_use]
    pub fn from_cells(cells: &[Point], key: OrientationKey) -> Self {
        let transformed: Cells = cells
            .iter()
            .map(|&p| {
                let mut q = if key.flipped { Point::new(-p.x, p.y) } else { p };
                for _ in 0..key.rotation {
                    q = Point::new(-q.y, q.x);
                }
                q
            })
            .collect();
        let cells = normalize(transformed);
        let width = cells.iter().map(|p| p.x).max().map_or(0, |m| m + 1);
        let height = cells.iter().map(|p| p.y).max().map_or(0, |m| m + 1);
        Self {
            key,
            cells,
            width,
            height,
        }
    }

    /// The first key (in enumeration order) that produced this orientation.
    #[must_use]
    pub fn key(&self) -> OrientationKey {
        self.key
    }

    /// Normalized, sorted offsets.
    #[must_use]
    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Board cells covered when the orientation's origin sits at `origin`.
    pub fn cells_at(&self, origin: Point) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().map(move |&c| origin.offset(c))
    }

    /// Same offset set, ignoring which key produced it.
    #[must_use]
    pub fn same_cells(&self, other: &Orientation) -> bool {
        self.cells == other.cells
    }
}
