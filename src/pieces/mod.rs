//! Piece catalog: the 21 polyomino shapes and their orientations.

pub mod catalog;
pub mod orientation;
pub mod shape;

pub use catalog::PieceCatalog;
pub use orientation::{Orientation, OrientationKey};
pub use shape::{Cells, PieceShape, TOTAL_CELLS};
