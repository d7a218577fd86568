//! Game rules: placement validation, legal move search, turn flow, scoring.
//!
//! Humans and bots go through the same functions here; nothing else
//! mutates a `GameState`.

pub mod placement;
pub mod scoring;
pub mod search;
pub mod turn;

pub use placement::{apply, validate, Placement, PlacementDelta};
pub use scoring::{score_slot, GameResult};
pub use search::{anchor_cells, anchored_placements, has_legal_placement, scan_placements};
pub use turn::{
    advance_turn, can_player_move, current_player, finalize_scores, is_game_over, result, start,
    SkipReason, TurnAdvance,
};
