//! Canonical polyomino shapes.
//!
//! Shapes are drawn as row strings: `#` is a filled cell, `.` is empty, the
//! first string is the top row. The drawing is parsed once into normalized
//! offsets when the catalog is built.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{PieceId, Point};

/// Cell offsets of a single piece. No piece exceeds five cells.
pub type Cells = SmallVec<[Point; 5]>;

/// Total cells over the full 21-piece set.
pub const TOTAL_CELLS: u32 = 89;

/// Row drawings for ids 1..=21, in id order.
pub(crate) const SHAPE_ROWS: [(&str, &[&str]); 21] = [
    ("monomino", &["#"]),
    ("domino", &["#", "#"]),
    ("I tromino", &["#", "#", "#"]),
    ("V tromino", &["#.", "##"]),
    ("I tetromino", &["#", "#", "#", "#"]),
    ("L tetromino", &[".#", ".#", "##"]),
    ("T tetromino", &["#.", "##", "#."]),
    ("O tetromino", &["##", "##"]),
    ("S tetromino", &["##.", ".##"]),
    ("I pentomino", &["#", "#", "#", "#", "#"]),
    ("L pentomino", &[".#", ".#", ".#", "##"]),
    ("N pentomino", &[".#", ".#", "##", "#."]),
    ("P pentomino", &[".#", "##", "##"]),
    ("U pentomino", &["##", ".#", "##"]),
    ("Y pentomino", &["#.", "##", "#.", "#."]),
    ("T pentomino", &[".#.", ".#.", "###"]),
    ("V pentomino", &["#..", "#..", "###"]),
    ("W pentomino", &["##.", ".##", "..#"]),
    ("F pentomino", &["#..", "###", ".#."]),
    ("Z pentomino", &["#..", "###", "..#"]),
    ("X pentomino", &[".#.", "###", ".#."]),
];

/// An immutable polyomino in its canonical orientation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceShape {
    id: PieceId,
    name: String,
    cells: Cells,
}

impl PieceShape {
    /// Build a shape from a row drawing.
    pub(crate) fn from_rows(id: PieceId, name: &str, rows: &[&str]) -> Self {
        let cells: Cells = rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.chars()
                    .enumerate()
                    .filter(|(_, ch)| *ch == '#')
                    .map(move |(x, _)| Point::new(x as i32, y as i32))
            })
            .collect();
        Self {
            id,
            name: name.to_string(),
            cells: normalize(cells),
        }
    }

    #[must_use]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized, sorted cell offsets.
    #[must_use]
    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    /// Number of unit cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// Shift cells so the minimum x and y are both 0, then sort.
pub(crate) fn normalize(mut cells: Cells) -> Cells {
    let min_x = cells.iter().map(|p| p.x).min().unwrap_or(0);
    let min_y = cells.iter().map(|p| p.y).min().unwrap_or(0);
    for p in cells.iter_mut() {
        p.x -= min_x;
        p.y -= min_y;
    }
    cells.sort_unstable();
    cells
}
