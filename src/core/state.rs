//! Game state.
//!
//! ## GameState
//!
//! Everything needed to resume a match:
//! - Status (Waiting, Playing, Finished)
//! - Seats in turn order and the turn cursor
//! - Board and typed move history
//! - Turn bookkeeping (turn number, pass streak, whether the current seat
//!   has placed this turn)
//!
//! History uses `im::Vector` so snapshots clone in O(1).
//!
//! State is only mutated through `rules::placement` and `rules::turn`.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::color::{Color, ColorMap};
use super::config::GameConfig;
use super::ids::PieceId;
use super::player::PlayerSlot;
use crate::board::Board;
use crate::pieces::OrientationKey;

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Created, seats may still be incomplete.
    #[default]
    Waiting,
    /// Moves are being accepted.
    Playing,
    /// Frozen. Scores are final.
    Finished,
}

/// A committed placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedMove {
    pub color: Color,
    pub piece: PieceId,
    pub x: i32,
    pub y: i32,
    pub orientation: OrientationKey,
}

/// Complete state of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,

    /// Seats in turn order.
    pub players: Vec<PlayerSlot>,

    pub current_player_index: usize,

    /// Passes recorded since the last placement.
    pub consecutive_passes: u32,

    pub board: Board,

    pub history: Vector<PlacedMove>,

    /// Incremented on every turn advance.
    pub turn_number: u64,

    /// Whether the current seat has placed since the last advance.
    pub placed_this_turn: bool,

    pub config: GameConfig,
}

impl GameState {
    /// A waiting game with the given seats.
    ///
    /// # Panics
    ///
    /// Panics if a color is seated twice.
    #[must_use]
    pub fn new(players: Vec<PlayerSlot>, config: GameConfig) -> Self {
        for (i, slot) in players.iter().enumerate() {
            assert!(
                players[..i].iter().all(|other| other.color != slot.color),
                "color {} seated twice",
                slot.color
            );
        }
        Self {
            status: GameStatus::Waiting,
            players,
            current_player_index: 0,
            consecutive_passes: 0,
            board: Board::new(),
            history: Vector::new(),
            turn_number: 0,
            placed_this_turn: false,
            config,
        }
    }

    /// Four seats in clockwise corner order, the first `humans` human.
    ///
    /// ```
    /// use rust_blokus::core::{Color, GameConfig, GameState};
    ///
    /// let state = GameState::standard(1, GameConfig::default());
    /// assert_eq!(state.players.len(), 4);
    /// assert!(!state.players[0].is_bot);
    /// assert_eq!(state.players[1].color, Color::Yellow);
    /// assert!(state.players[1].is_bot);
    /// ```
    #[must_use]
    pub fn standard(humans: usize, config: GameConfig) -> Self {
        Self::new(PlayerSlot::standard_seats(humans), config)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    /// Seat for a color, if seated.
    #[must_use]
    pub fn player(&self, color: Color) -> Option<&PlayerSlot> {
        self.players.iter().find(|p| p.color == color)
    }

    pub fn player_mut(&mut self, color: Color) -> Option<&mut PlayerSlot> {
        self.players.iter_mut().find(|p| p.color == color)
    }

    /// Seat under the turn cursor, regardless of status.
    #[must_use]
    pub fn seat_at_cursor(&self) -> Option<&PlayerSlot> {
        self.players.get(self.current_player_index)
    }

    /// Scores per color. Unseated colors report 0.
    #[must_use]
    pub fn scores(&self) -> ColorMap<i32> {
        ColorMap::new(|color| self.player(color).map_or(0, |p| p.score))
    }

    /// Moves placed by one color, in play order.
    pub fn moves_by(&self, color: Color) -> impl Iterator<Item = &PlacedMove> {
        self.history.iter().filter(move |m| m.color == color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(
            vec![PlayerSlot::human(Color::Red), PlayerSlot::bot(Color::Blue)],
            GameConfig::default(),
        );
        assert_eq!(state.status, GameStatus::Waiting);
        assert_eq!(state.current_player_index, 0);
        assert_eq!(state.turn_number, 0);
        assert!(state.history.is_empty());
        assert_eq!(state.seat_at_cursor().map(|p| p.color), Some(Color::Red));
        assert!(state.player(Color::Green).is_none());
    }

    #[test]
    #[should_panic(expected = "seated twice")]
    fn test_duplicate_color_panics() {
        let _ = GameState::new(
            vec![PlayerSlot::human(Color::Red), PlayerSlot::bot(Color::Red)],
            GameConfig::default(),
        );
    }

    #[test]
    fn test_standard_seating() {
        let state = GameState::standard(0, GameConfig::default());
        let colors: Vec<_> = state.players.iter().map(|p| p.color).collect();
        assert_eq!(colors, Color::CLOCKWISE.to_vec());
        assert!(state.players.iter().all(|p| p.is_bot));
    }

    #[test]
    fn test_scores_default_zero() {
        let mut state = GameState::standard(4, GameConfig::default());
        if let Some(p) = state.player_mut(Color::Green) {
            p.score = 12;
        }
        let scores = state.scores();
        assert_eq!(scores[Color::Green], 12);
        assert_eq!(scores[Color::Blue], 0);
    }

    #[test]
    fn test_state_serialization() {
        let state = GameState::standard(2, GameConfig::default());
        let bytes = bincode::serialize(&state).unwrap();
        let back: GameState = bincode::deserialize(&bytes).unwrap();
        assert_eq!(state, back);
    }
}
