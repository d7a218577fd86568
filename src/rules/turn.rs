//! Turn coordination.
//!
//! ## Lifecycle
//!
//! `Waiting -> Playing -> Finished`. Nothing leaves `Finished`.
//!
//! ## Advancing
//!
//! An advance closes the current seat's turn (recording a pass if it did
//! not place) and walks the seats cyclically, skipping every seat with no
//! legal placement. If the walk comes back around without finding a seat
//! that can move, the game is over and scores are finalized.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{Color, ColorMap, EngineError, EngineResult, GameState, GameStatus, PlayerSlot};

use super::scoring::{apply_scores, result_of, GameResult};
use super::search::has_legal_placement;

/// Why a seat's turn ended without a placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkipReason {
    /// No remaining piece fits anywhere.
    NoLegalMove,
    /// The seat could have moved but gave up the turn (turn timer).
    Forfeit,
}

/// Outcome of a turn advance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnAdvance {
    /// Seats whose turn ended without a placement, in order.
    pub skipped: Vec<(Color, SkipReason)>,
    /// The new current seat, `None` once finished.
    pub next: Option<Color>,
    pub finished: bool,
}

/// Fill missing colors with bots and begin play.
///
/// Bots are appended in clockwise corner order, so a started game always
/// seats all four colors.
pub fn start(state: &mut GameState) -> EngineResult<()> {
    if state.status != GameStatus::Waiting {
        return Err(EngineError::illegal_state(format!(
            "cannot start a game that is {:?}",
            state.status
        )));
    }
    for color in Color::CLOCKWISE {
        if state.player(color).is_none() {
            state.players.push(PlayerSlot::bot(color));
        }
    }
    state.status = GameStatus::Playing;
    state.current_player_index = 0;
    state.consecutive_passes = 0;
    state.placed_this_turn = false;
    state.turn_number += 1;
    info!(
        seats = state.players.len(),
        first = %state.players[0].color,
        "game started"
    );
    Ok(())
}

/// The seat whose turn it is. `None` unless playing.
#[must_use]
pub fn current_player(state: &GameState) -> Option<&PlayerSlot> {
    if state.is_playing() {
        state.seat_at_cursor()
    } else {
        None
    }
}

/// Whether `color` holds a piece that fits somewhere right now.
#[must_use]
pub fn can_player_move(state: &GameState, color: Color) -> bool {
    state
        .player(color)
        .is_some_and(|slot| has_legal_placement(&state.board, color, slot.remaining))
}

fn can_seat_move(state: &GameState, index: usize) -> bool {
    let slot = &state.players[index];
    has_legal_placement(&state.board, slot.color, slot.remaining)
}

/// End the current seat's turn and move to the next seat that can move.
pub fn advance_turn(state: &mut GameState) -> EngineResult<TurnAdvance> {
    if !state.is_playing() {
        return Err(EngineError::illegal_state(format!(
            "cannot advance a game that is {:?}",
            state.status
        )));
    }

    let seats = state.players.len();
    let current = state.current_player_index;
    let mut skipped = Vec::new();

    let current_passed = !state.placed_this_turn;
    if current_passed {
        let reason = if can_seat_move(state, current) {
            SkipReason::Forfeit
        } else {
            SkipReason::NoLegalMove
        };
        state.consecutive_passes += 1;
        skipped.push((state.players[current].color, reason));
    }

    state.placed_this_turn = false;
    state.turn_number += 1;

    for step in 1..=seats {
        let index = (current + step) % seats;
        if can_seat_move(state, index) {
            state.current_player_index = index;
            let next = state.players[index].color;
            for (color, reason) in &skipped {
                debug!(color = %color, reason = ?reason, "seat skipped");
            }
            debug!(next = %next, turn = state.turn_number, "turn advanced");
            return Ok(TurnAdvance {
                skipped,
                next: Some(next),
                finished: false,
            });
        }
        if index == current && current_passed {
            continue;
        }
        state.consecutive_passes += 1;
        skipped.push((state.players[index].color, SkipReason::NoLegalMove));
    }

    finish(state);
    Ok(TurnAdvance {
        skipped,
        next: None,
        finished: true,
    })
}

/// True once no further placement can happen.
#[must_use]
pub fn is_game_over(state: &GameState) -> bool {
    match state.status {
        GameStatus::Finished => true,
        GameStatus::Waiting => false,
        GameStatus::Playing => (0..state.players.len()).all(|i| !can_seat_move(state, i)),
    }
}

/// Final scores, finishing a terminal game first.
pub fn finalize_scores(state: &mut GameState) -> EngineResult<ColorMap<i32>> {
    if state.is_finished() {
        return Ok(state.scores());
    }
    if state.is_playing() && is_game_over(state) {
        finish(state);
        return Ok(state.scores());
    }
    Err(EngineError::illegal_state("game is not over"))
}

/// Winner(s) of a finished game.
#[must_use]
pub fn result(state: &GameState) -> Option<GameResult> {
    if state.is_finished() {
        result_of(&state.players)
    } else {
        None
    }
}

fn finish(state: &mut GameState) {
    state.status = GameStatus::Finished;
    apply_scores(state);
    info!(
        turns = state.turn_number,
        moves = state.history.len(),
        "game finished"
    );
}
