//! Board grid and cell queries.

pub mod grid;

pub use grid::Board;
