//! The shared 21-piece catalog.
//!
//! Built once on first use and shared for the life of the process. Every
//! shape carries its deduplicated orientations plus a lookup table so any
//! of the eight `OrientationKey`s resolves, even when several keys share
//! the same cells.

use std::sync::OnceLock;

use rustc_hash::FxHashSet;

use crate::core::{Color, EngineResult, PieceId};

use super::orientation::{Orientation, OrientationKey};
use super::shape::{PieceShape, SHAPE_ROWS};

struct CatalogEntry {
    shape: PieceShape,
    orientations: Vec<Orientation>,
    /// `OrientationKey::index()` -> position in `orientations`.
    by_key: [usize; 8],
}

/// Immutable registry of the 21 shapes and their orientations.
pub struct PieceCatalog {
    entries: Vec<CatalogEntry>,
    shapes: Vec<PieceShape>,
}

impl PieceCatalog {
    fn build() -> Self {
        let entries: Vec<CatalogEntry> = PieceId::all()
            .zip(SHAPE_ROWS.iter())
            .map(|(id, (name, rows))| {
                let shape = PieceShape::from_rows(id, name, rows);
                let (orientations, by_key) = orientations_for(&shape);
                CatalogEntry {
                    shape,
                    orientations,
                    by_key,
                }
            })
            .collect();
        let shapes = entries.iter().map(|e| e.shape.clone()).collect();
        Self { entries, shapes }
    }

    /// The process-wide catalog.
    pub fn global() -> &'static PieceCatalog {
        static CATALOG: OnceLock<PieceCatalog> = OnceLock::new();
        CATALOG.get_or_init(PieceCatalog::build)
    }

    /// The 21 shapes in id order. Shapes are the same for every color.
    #[must_use]
    pub fn shapes_of(&self, _color: Color) -> &[PieceShape] {
        &self.shapes
    }

    #[must_use]
    pub fn shape(&self, piece: PieceId) -> &PieceShape {
        &self.entries[piece.index()].shape
    }

    /// Distinct orientations of a piece, each tagged with the first key
    /// that produced it.
    #[must_use]
    pub fn orientations_of(&self, piece: PieceId) -> &[Orientation] {
        &self.entries[piece.index()].orientations
    }

    /// Resolve any key, including ones that duplicate an earlier key.
    #[must_use]
    pub fn orientation(&self, piece: PieceId, key: OrientationKey) -> &Orientation {
        let entry = &self.entries[piece.index()];
        &entry.orientations[entry.by_key[key.index()]]
    }

    /// Cell count of a piece.
    #[must_use]
    pub fn size(&self, piece: PieceId) -> usize {
        self.shape(piece).size()
    }
}

fn orientations_for(shape: &PieceShape) -> (Vec<Orientation>, [usize; 8]) {
    let mut orientations: Vec<Orientation> = Vec::with_capacity(8);
    let mut seen = FxHashSet::default();
    let mut by_key = [0usize; 8];

    for key in OrientationKey::all() {
        let candidate = Orientation::from_cells(shape.cells(), key);
        let cells = candidate.cells().to_vec();
        if seen.insert(cells) {
            by_key[key.index()] = orientations.len();
            orientations.push(candidate);
        } else {
            let pos = orientations
                .iter()
                .position(|o| o.same_cells(&candidate))
                .unwrap_or(0);
            by_key[key.index()] = pos;
        }
    }

    (orientations, by_key)
}

// =============================================================================
// Free-function shorthands over the global catalog
// =============================================================================

/// Shapes for a color (the full set).
pub fn shapes_of(color: Color) -> &'static [PieceShape] {
    PieceCatalog::global().shapes_of(color)
}

/// Shape by raw id, failing with `NotFound` outside 1..=21.
pub fn shape(raw_id: u8) -> EngineResult<&'static PieceShape> {
    let id = PieceId::new(raw_id)?;
    Ok(PieceCatalog::global().shape(id))
}

/// Orientations by raw id, failing with `NotFound` outside 1..=21.
pub fn orientations_of(raw_id: u8) -> EngineResult<&'static [Orientation]> {
    let id = PieceId::new(raw_id)?;
    Ok(PieceCatalog::global().orientations_of(id))
}

/// Resolve raw id plus raw key parts.
pub fn orientation(raw_id: u8, rotation: u8, flipped: bool) -> EngineResult<&'static Orientation> {
    let id = PieceId::new(raw_id)?;
    let key = OrientationKey::new(rotation, flipped)?;
    Ok(PieceCatalog::global().orientation(id, key))
}
