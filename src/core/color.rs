//! Seat colors and per-color storage.
//!
//! ## Color
//!
//! The four seat colors. Each owns a fixed starting corner of the board.
//!
//! ## ColorMap
//!
//! Per-color data storage backed by a fixed array for O(1) access.
//! Supports iteration and indexing by `Color`.
//!
//! ## ColorSet
//!
//! A 4-bit set of colors, returned by neighbor queries on the board.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::ids::Point;

/// Side length of the square board.
pub const BOARD_SIZE: i32 = 20;

/// Seat color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Yellow,
    Red,
    Green,
}

impl Color {
    /// All colors in declaration order.
    pub const ALL: [Color; 4] = [Color::Blue, Color::Yellow, Color::Red, Color::Green];

    /// Colors in the clockwise order of their corners, used for seating.
    pub const CLOCKWISE: [Color; 4] = [Color::Blue, Color::Yellow, Color::Green, Color::Red];

    /// Dense index for array-backed storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::Blue => 0,
            Color::Yellow => 1,
            Color::Red => 2,
            Color::Green => 3,
        }
    }

    /// The board corner this color's first piece must cover.
    ///
    /// ```
    /// use rust_blokus::core::{Color, Point};
    ///
    /// assert_eq!(Color::Blue.start_corner(), Point::new(0, 0));
    /// assert_eq!(Color::Green.start_corner(), Point::new(19, 19));
    /// ```
    #[must_use]
    pub const fn start_corner(self) -> Point {
        let far = BOARD_SIZE - 1;
        match self {
            Color::Blue => Point::new(0, 0),
            Color::Yellow => Point::new(far, 0),
            Color::Red => Point::new(0, far),
            Color::Green => Point::new(far, far),
        }
    }

    /// Single-letter tag used by board rendering.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::Green => "green",
        };
        f.pad(name)
    }
}

/// Per-color data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use rust_blokus::core::{Color, ColorMap};
///
/// let mut scores: ColorMap<i32> = ColorMap::with_value(0);
/// scores[Color::Red] = 42;
/// assert_eq!(scores[Color::Red], 42);
/// assert_eq!(scores[Color::Blue], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; 4],
}

impl<T> ColorMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Color) -> T) -> Self {
        Self {
            data: Color::ALL.map(factory),
        }
    }

    /// Create a map with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    #[must_use]
    pub fn get(&self, color: Color) -> &T {
        &self.data[color.index()]
    }

    pub fn get_mut(&mut self, color: Color) -> &mut T {
        &mut self.data[color.index()]
    }

    /// Iterate over (Color, &T) pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        self.get(color)
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        self.get_mut(color)
    }
}

/// Compact set of colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorSet(u8);

impl ColorSet {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, color: Color) {
        self.0 |= 1 << color.index();
    }

    #[must_use]
    pub const fn contains(self, color: Color) -> bool {
        self.0 & (1 << color.index()) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any color other than `color` is present.
    #[must_use]
    pub const fn contains_other_than(self, color: Color) -> bool {
        self.0 & !(1 << color.index()) != 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut set = ColorSet::empty();
        for color in iter {
            set.insert(color);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_corners_are_distinct_corners() {
        let corners: Vec<_> = Color::ALL.iter().map(|c| c.start_corner()).collect();
        assert_eq!(corners[0], Point::new(0, 0));
        assert_eq!(corners[1], Point::new(19, 0));
        assert_eq!(corners[2], Point::new(0, 19));
        assert_eq!(corners[3], Point::new(19, 19));
    }

    #[test]
    fn test_clockwise_seating_order() {
        assert_eq!(
            Color::CLOCKWISE,
            [Color::Blue, Color::Yellow, Color::Green, Color::Red]
        );
    }

    #[test]
    fn test_color_map_new_and_mutation() {
        let mut map: ColorMap<usize> = ColorMap::new(|c| c.index() * 10);
        assert_eq!(map[Color::Yellow], 10);
        map[Color::Green] = 7;
        assert_eq!(map[Color::Green], 7);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[0], (Color::Blue, &0));
        assert_eq!(pairs[3], (Color::Green, &7));
    }

    #[test]
    fn test_color_map_serialization() {
        let map: ColorMap<i32> = ColorMap::new(|c| c.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let back: ColorMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }

    #[test]
    fn test_color_set() {
        let mut set = ColorSet::empty();
        assert!(set.is_empty());
        set.insert(Color::Red);
        set.insert(Color::Red);
        set.insert(Color::Blue);
        assert_eq!(set.len(), 2);
        assert!(set.contains(Color::Red));
        assert!(!set.contains(Color::Green));
        assert!(set.contains_other_than(Color::Red));

        let only_red: ColorSet = [Color::Red].into_iter().collect();
        assert!(!only_red.contains_other_than(Color::Red));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Color::Blue, Color::Red]);
    }
}
