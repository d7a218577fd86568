//! Placement rule verification tests.
//!
//! These tests drive the rule engine through its public API and check the
//! catalog, the first-move corner rule, the edge and corner contact rules,
//! and that rejected moves leave the game untouched.

use rust_blokus::core::{
    Color, EngineError, GameConfig, GameState, PieceId, PieceSet, Point, RejectReason,
};
use rust_blokus::pieces::{catalog, OrientationKey, PieceCatalog};
use rust_blokus::rules::{self, Placement};

fn key(rotation: u8, flipped: bool) -> OrientationKey {
    OrientationKey::new(rotation, flipped).unwrap()
}

fn piece(id: u8) -> PieceId {
    PieceId::new(id).unwrap()
}

/// Piece `id` in its drawn orientation.
fn upright(id: u8, x: i32, y: i32) -> Placement {
    Placement::new(piece(id), key(0, false), x, y)
}

fn started() -> GameState {
    let mut state = GameState::standard(4, GameConfig::default());
    rules::start(&mut state).unwrap();
    state
}

/// Place for the current seat and hand the turn on.
fn play(state: &mut GameState, id: u8, k: OrientationKey, x: i32, y: i32) {
    let color = rules::current_player(state).unwrap().color;
    rules::apply(state, color, Placement::new(piece(id), k, x, y)).unwrap();
    rules::advance_turn(state).unwrap();
}

#[test]
fn test_catalog_shape_sizes() {
    let catalog = PieceCatalog::global();
    let sizes: Vec<usize> = PieceId::all().map(|p| catalog.size(p)).collect();
    assert_eq!(sizes.iter().sum::<usize>(), 89);
    assert_eq!(sizes.iter().filter(|&&s| s == 5).count(), 12);
    assert_eq!(sizes.iter().filter(|&&s| s == 4).count(), 5);
}

#[test]
fn test_orientation_keys_all_resolve_for_every_piece() {
    for id in 1..=21u8 {
        for rotation in 0..4 {
            for flipped in [false, true] {
                let o = catalog::orientation(id, rotation, flipped).unwrap();
                assert_eq!(o.size(), catalog::shape(id).unwrap().size());
                assert!(o.cells().iter().all(|c| c.x >= 0 && c.y >= 0));
                assert!(o.cells().iter().any(|c| c.x == 0));
                assert!(o.cells().iter().any(|c| c.y == 0));
            }
        }
    }
}

#[test]
fn test_every_color_opens_in_its_corner() {
    let mut state = started();
    let corners = [
        (Color::Blue, 0, 0),
        (Color::Yellow, 19, 0),
        (Color::Green, 19, 19),
        (Color::Red, 0, 19),
    ];
    for (color, x, y) in corners {
        assert_eq!(rules::current_player(&state).unwrap().color, color);
        play(&mut state, 1, key(0, false), x, y);
    }
    for color in Color::ALL {
        let corner = color.start_corner();
        assert_eq!(state.board.cell_color(corner.x, corner.y), Ok(Some(color)));
    }
    assert_eq!(state.history.len(), 4);
}

#[test]
fn test_first_move_off_corner_is_rejected() {
    let mut state = started();
    let err = rules::apply(&mut state, Color::Blue, upright(10, 1, 0)).unwrap_err();
    assert_eq!(err, EngineError::Rejected(RejectReason::MustCoverStartCorner));
}

#[test]
fn test_second_move_needs_corner_contact_without_edges() {
    let mut state = started();
    // Blue: vertical I3 at x=0, rows 0..=2.
    play(&mut state, 3, key(0, false), 0, 0);
    play(&mut state, 1, key(0, false), 19, 0);
    play(&mut state, 1, key(0, false), 19, 19);
    play(&mut state, 1, key(0, false), 0, 19);

    // Sharing an edge with (0,2).
    let err = rules::apply(&mut state, Color::Blue, upright(2, 0, 3)).unwrap_err();
    assert_eq!(err.reject_reason(), Some(RejectReason::EdgeTouchSameColor));

    // Floating in the middle of the board.
    let err = rules::apply(&mut state, Color::Blue, upright(2, 8, 8)).unwrap_err();
    assert_eq!(err.reject_reason(), Some(RejectReason::NoCornerContact));

    // Diagonal to (0,2) at (1,3).
    let delta = rules::apply(&mut state, Color::Blue, upright(2, 1, 3)).unwrap();
    assert_eq!(delta.cells, vec![Point::new(1, 3), Point::new(1, 4)]);
}

#[test]
fn test_rejected_move_changes_nothing() {
    let mut state = started();
    play(&mut state, 1, key(0, false), 0, 0);
    let before = state.clone();

    let attempts = [
        Placement::new(piece(5), key(0, false), 19, 18),
        Placement::new(piece(1), key(0, false), 0, 0),
        Placement::new(piece(2), key(1, false), 17, 0),
    ];
    for attempt in attempts {
        assert!(rules::apply(&mut state, Color::Yellow, attempt).is_err());
        assert_eq!(state, before);
    }
}

#[test]
fn test_used_piece_is_unavailable() {
    let mut state = started();
    play(&mut state, 1, key(0, false), 0, 0);
    play(&mut state, 1, key(0, false), 19, 0);
    play(&mut state, 1, key(0, false), 19, 19);
    play(&mut state, 1, key(0, false), 0, 19);

    let err = rules::apply(&mut state, Color::Blue, upright(1, 1, 1)).unwrap_err();
    assert_eq!(err.reject_reason(), Some(RejectReason::PieceUnavailable));
    assert!(!state.player(Color::Blue).unwrap().remaining.contains(piece(1)));
    assert_eq!(state.player(Color::Blue).unwrap().remaining.len(), 20);
}

#[test]
fn test_stuck_color_has_no_legal_placement() {
    let mut state = started();
    if let Some(slot) = state.player_mut(Color::Blue) {
        slot.remaining = [piece(21)].into_iter().collect::<PieceSet>();
    }
    // The X pentomino cannot cover a corner cell.
    assert!(!rules::can_player_move(&state, Color::Blue));
    let remaining = state.player(Color::Blue).unwrap().remaining;
    assert!(rules::anchored_placements(&state.board, Color::Blue, remaining).is_empty());
}

#[test]
fn test_monomino_then_domino_from_the_corner() {
    let catalog = PieceCatalog::global();
    let monomino = catalog.orientation(piece(1), key(0, false));
    let vertical = catalog.orientation(piece(2), key(0, false));
    let horizontal = catalog.orientation(piece(2), key(1, false));

    let mut board = rust_blokus::board::Board::new();
    assert!(rules::validate(&board, Color::Blue, monomino, 0, 0).is_ok());
    board.apply(monomino, 0, 0, Color::Blue);
    assert_eq!(board.cell_color(0, 0), Ok(Some(Color::Blue)));
    assert_eq!(board.occupied_count(), 1);

    // Any domino with a cell on (1,0) or (0,1).
    for (o, x, y) in [(horizontal, 1, 0), (vertical, 0, 1), (vertical, 1, 0), (horizontal, 0, 1)] {
        assert_eq!(
            rules::validate(&board, Color::Blue, o, x, y),
            Err(RejectReason::EdgeTouchSameColor)
        );
    }
    // Diagonal to (0,0) with no shared edge.
    assert!(rules::validate(&board, Color::Blue, vertical, 1, 1).is_ok());
    assert!(rules::validate(&board, Color::Blue, horizontal, 1, 1).is_ok());
}
