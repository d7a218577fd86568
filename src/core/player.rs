//! Seats and their piece inventories.
//!
//! ## PieceSet
//!
//! A 21-bit set of catalog pieces. A fresh seat holds every piece; placing
//! one removes it for good.
//!
//! ## PlayerSlot
//!
//! One seat at the table: its color, whether a bot plays it, the pieces it
//! still holds and its score once the game has finished.

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::ids::PieceId;

/// Bit set of `PieceId`s.
///
/// ```
/// use rust_blokus::core::{PieceId, PieceSet};
///
/// let mut set = PieceSet::full();
/// assert_eq!(set.len(), 21);
/// set.remove(PieceId::MONOMINO);
/// assert!(!set.contains(PieceId::MONOMINO));
/// assert_eq!(set.len(), 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceSet(u32);

impl PieceSet {
    const FULL_MASK: u32 = (1 << PieceId::MAX) - 1;

    /// All 21 pieces.
    #[must_use]
    pub const fn full() -> Self {
        Self(Self::FULL_MASK)
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn contains(self, piece: PieceId) -> bool {
        self.0 & (1 << piece.index()) != 0
    }

    pub fn insert(&mut self, piece: PieceId) {
        self.0 |= 1 << piece.index();
    }

    /// Remove a piece. Returns whether it was present.
    pub fn remove(&mut self, piece: PieceId) -> bool {
        let present = self.contains(piece);
        self.0 &= !(1 << piece.index());
        present
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Pieces in ascending id order.
    pub fn iter(self) -> impl Iterator<Item = PieceId> {
        PieceId::all().filter(move |p| self.contains(*p))
    }
}

impl Default for PieceSet {
    fn default() -> Self {
        Self::full()
    }
}

impl FromIterator<PieceId> for PieceSet {
    fn from_iter<I: IntoIterator<Item = PieceId>>(iter: I) -> Self {
        let mut set = PieceSet::empty();
        for piece in iter {
            set.insert(piece);
        }
        set
    }
}

/// A seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub color: Color,
    pub is_bot: bool,
    /// Pieces not yet placed.
    pub remaining: PieceSet,
    /// Final score. Zero until the game is finished.
    pub score: i32,
    /// Most recently placed piece, for the monomino bonus.
    pub last_piece: Option<PieceId>,
}

impl PlayerSlot {
    /// A seat holding the full piece set.
    #[must_use]
    pub fn new(color: Color, is_bot: bool) -> Self {
        Self {
            color,
            is_bot,
            remaining: PieceSet::full(),
            score: 0,
            last_piece: None,
        }
    }

    #[must_use]
    pub fn human(color: Color) -> Self {
        Self::new(color, false)
    }

    #[must_use]
    pub fn bot(color: Color) -> Self {
        Self::new(color, true)
    }

    /// Four seats in clockwise corner order, the first `humans` human.
    #[must_use]
    pub fn standard_seats(humans: usize) -> Vec<Self> {
        Color::CLOCKWISE
            .iter()
            .enumerate()
            .map(|(i, &color)| Self::new(color, i >= humans))
            .collect()
    }

    /// True once every piece has been placed.
    #[must_use]
    pub fn placed_all(&self) -> bool {
        self.remaining.is_empty()
    }
}

impl std::fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_bot { "bot" } else { "human" };
        write!(f, "{} ({kind}, {} left)", self.color, self.remaining.len())
    }
}
