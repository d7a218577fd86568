//! The 20x20 placement grid.
//!
//! Each cell is empty or owned by one color, and ownership never changes
//! once written. A per-color cell count is kept alongside the grid so the
//! "first move" check is O(1).

use serde::{Deserialize, Serialize};

use crate::core::{Color, ColorMap, ColorSet, EngineError, EngineResult, Point, BOARD_SIZE};
use crate::pieces::Orientation;

const CELL_COUNT: usize = (BOARD_SIZE * BOARD_SIZE) as usize;

/// Board grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Option<Color>>,
    counts: ColorMap<u32>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: vec![None; CELL_COUNT],
            counts: ColorMap::with_value(0),
        }
    }

    /// Side length of the board.
    #[must_use]
    pub const fn size(&self) -> i32 {
        BOARD_SIZE
    }

    #[must_use]
    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        (0..BOARD_SIZE).contains(&x) && (0..BOARD_SIZE).contains(&y)
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.is_in_bounds(p.x, p.y)
    }

    fn idx(x: i32, y: i32) -> usize {
        (y * BOARD_SIZE + x) as usize
    }

    /// Owner of a cell, `OutOfRange` off the board.
    pub fn cell_color(&self, x: i32, y: i32) -> EngineResult<Option<Color>> {
        if !self.is_in_bounds(x, y) {
            return Err(EngineError::OutOfRange { x, y });
        }
        Ok(self.cells[Self::idx(x, y)])
    }

    /// Owner of a cell, `None` when empty or off the board.
    #[must_use]
    pub fn get(&self, p: Point) -> Option<Color> {
        if self.contains(p) {
            self.cells[Self::idx(p.x, p.y)]
        } else {
            None
        }
    }

    /// True if the cell is on the board and unowned.
    #[must_use]
    pub fn is_empty_at(&self, p: Point) -> bool {
        self.contains(p) && self.cells[Self::idx(p.x, p.y)].is_none()
    }

    /// Stamp an orientation with its origin at `(origin_x, origin_y)`.
    ///
    /// # Panics
    ///
    /// Panics if any cell is off the board or already owned. Callers
    /// validate before applying.
    pub fn apply(&mut self, orientation: &Orientation, origin_x: i32, origin_y: i32, color: Color) {
        let origin = Point::new(origin_x, origin_y);
        for p in orientation.cells_at(origin) {
            assert!(self.contains(p), "cell {p} is off the board");
            let idx = Self::idx(p.x, p.y);
            assert!(self.cells[idx].is_none(), "cell {p} is already occupied");
            self.cells[idx] = Some(color);
        }
        self.counts[color] += orientation.size() as u32;
    }

    /// Colors on the four edge neighbors of a cell.
    #[must_use]
    pub fn occupied_neighbors4(&self, x: i32, y: i32) -> ColorSet {
        Point::new(x, y)
            .edge_neighbors()
            .into_iter()
            .filter_map(|n| self.get(n))
            .collect()
    }

    /// Colors on the four diagonal neighbors of a cell.
    #[must_use]
    pub fn occupied_diagonal_neighbors(&self, x: i32, y: i32) -> ColorSet {
        Point::new(x, y)
            .diagonal_neighbors()
            .into_iter()
            .filter_map(|n| self.get(n))
            .collect()
    }

    /// True once `color` owns at least one cell.
    #[must_use]
    pub fn has_color(&self, color: Color) -> bool {
        self.counts[color] > 0
    }

    /// Number of cells owned by `color`.
    #[must_use]
    pub fn cell_count(&self, color: Color) -> u32 {
        self.counts[color]
    }

    /// Number of owned cells across all colors.
    #[must_use]
    pub fn occupied_count(&self) -> u32 {
        self.counts.iter().map(|(_, n)| *n).sum()
    }

    /// Cells owned by `color`, in row-major order.
    pub fn cells_of(&self, color: Color) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            (*c == Some(color)).then(|| Point::new(i as i32 % BOARD_SIZE, i as i32 / BOARD_SIZE))
        })
    }

    /// ASCII rendering, one row per line, `.` for empty.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(CELL_COUNT + BOARD_SIZE as usize);
        for row in self.cells.chunks(BOARD_SIZE as usize) {
            out.extend(row.iter().map(|c| c.map_or('.', Color::symbol)));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::catalog;

    #[test]
    fn test_bounds() {
        let board = Board::new();
        assert!(board.is_in_bounds(0, 0));
        assert!(board.is_in_bounds(19, 19));
        assert!(!board.is_in_bounds(20, 0));
        assert!(!board.is_in_bounds(0, -1));
    }

    #[test]
    fn test_cell_color_out_of_range() {
        let board = Board::new();
        assert_eq!(board.cell_color(3, 4), Ok(None));
        assert_eq!(board.cell_color(20, 4), Err(EngineError::OutOfRange { x: 20, y: 4 }));
    }

    #[test]
    fn test_apply_writes_cells_and_counts() {
        let mut board = Board::new();
        let bar = catalog::orientation(3, 0, false).unwrap();
        board.apply(bar, 0, 0, Color::Blue);

        assert_eq!(board.cell_color(0, 0), Ok(Some(Color::Blue)));
        assert_eq!(board.cell_color(0, 2), Ok(Some(Color::Blue)));
        assert_eq!(board.cell_color(1, 0), Ok(None));
        assert_eq!(board.cell_count(Color::Blue), 3);
        assert!(board.has_color(Color::Blue));
        assert!(!board.has_color(Color::Red));
        assert_eq!(board.occupied_count(), 3);
        assert_eq!(board.cells_of(Color::Blue).count(), 3);
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn test_apply_overlap_panics() {
        let mut board = Board::new();
        let mono = catalog::orientation(1, 0, false).unwrap();
        board.apply(mono, 5, 5, Color::Blue);
        board.apply(mono, 5, 5, Color::Red);
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn test_apply_out_of_bounds_panics() {
        let mut board = Board::new();
        let domino = catalog::orientation(2, 0, false).unwrap();
        board.apply(domino, 0, 19, Color::Red);
    }

    #[test]
    fn test_neighbor_queries() {
        let mut board = Board::new();
        let mono = catalog::orientation(1, 0, false).unwrap();
        board.apply(mono, 5, 4, Color::Blue);
        board.apply(mono, 6, 6, Color::Red);

        let edge = board.occupied_neighbors4(5, 5);
        assert!(edge.contains(Color::Blue));
        assert!(!edge.contains(Color::Red));

        let diag = board.occupied_diagonal_neighbors(5, 5);
        assert!(diag.contains(Color::Red));
        assert!(!diag.contains(Color::Blue));

        assert!(board.occupied_neighbors4(0, 0).is_empty());
    }

    #[test]
    fn test_render() {
        let mut board = Board::new();
        let mono = catalog::orientation(1, 0, false).unwrap();
        board.apply(mono, 19, 0, Color::Yellow);
        let text = board.render();
        let first = text.lines().next().unwrap();
        assert_eq!(first.len(), 20);
        assert!(first.ends_with('Y'));
        assert_eq!(text.lines().count(), 20);
    }
}
