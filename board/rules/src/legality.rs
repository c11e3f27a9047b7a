//! Filtering candidate moves down to the ones which keep the mover's king safe
//!
//! Each candidate is tried on the real board and then taken back. Between [`simulate`] and
//! [`revert`] the board holds a position which never happened, so nothing else may look at it.

use board::{Board, Color, Piece, Square};
use utils::{invariant, InvariantExpect};

use crate::{attack::is_attacked, movement::en_passant_victim, movement::Movement};

/// What [`revert`] needs to take back a simulated move
#[derive(Debug)]
#[must_use = "a simulated move must be reverted"]
pub struct Undo {
    origin: Square,
    destination: Square,
    mover_moved: bool,
    /// Still remembers the square it was taken from, which for en passant isn't the destination
    captured: Option<Piece>,
}

/// Make the move on the board, remembering how to take it back
///
/// Only the mover and whatever it captures are touched. A castling rook stays in its corner, as
/// castling already requires every square the king crosses to be unattacked.
///
/// # Panics
/// If there is no piece on `from`.
pub fn simulate(
    board: &mut Board,
    from: Square,
    to: Square,
    en_passant_target: Option<Square>,
) -> Undo {
    let mover_moved = board
        .get(from)
        .expect_invariant("simulated move starts from an occupied square")
        .moved;
    let captured = match en_passant_victim(board, from, to, en_passant_target) {
        Some(victim) => board.take(victim),
        None => board.take(to),
    };
    board.relocate(from, to);
    if let Some(mover) = board.get_mut(to) {
        mover.moved = true;
    }
    Undo {
        origin: from,
        destination: to,
        mover_moved,
        captured,
    }
}

/// Take back a move made by [`simulate`]
pub fn revert(board: &mut Board, undo: Undo) {
    let Undo {
        origin,
        destination,
        mover_moved,
        captured,
    } = undo;
    let displaced = board.relocate(destination, origin);
    invariant!(
        displaced.is_none(),
        "{origin} was reoccupied while a move from it was simulated"
    );
    if let Some(mover) = board.get_mut(origin) {
        mover.moved = mover_moved;
    }
    if let Some(piece) = captured {
        board.put(piece.position(), piece);
    }
}

/// Whether the piece on `from` can move to `to` without leaving its own king attacked
pub fn leaves_king_safe(
    board: &mut Board,
    from: Square,
    to: Square,
    en_passant_target: Option<Square>,
) -> bool {
    let color = board
        .get(from)
        .expect_invariant("checked move starts from an occupied square")
        .color;
    let undo = simulate(board, from, to, en_passant_target);
    let king = board
        .king_square(color)
        .expect_invariant("each side has a king on the board");
    let safe = !is_attacked(board, king, color.other());
    revert(board, undo);
    safe
}

/// The squares the piece on `from` may legally move to
///
/// Empty if there is no piece on `from`.
pub fn legal_moves(board: &mut Board, from: Square, en_passant_target: Option<Square>) -> Vec<Square> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    let candidates = piece.candidate_moves(board, en_passant_target);
    candidates
        .into_iter()
        .filter(|&to| leaves_king_safe(board, from, to, en_passant_target))
        .collect()
}

/// Whether any piece of the given color has a legal move
pub fn has_legal_moves(board: &mut Board, color: Color, en_passant_target: Option<Square>) -> bool {
    let origins = board
        .pieces_of(color)
        .map(Piece::position)
        .collect::<Vec<_>>();
    origins
        .into_iter()
        .any(|from| !legal_moves(board, from, en_passant_target).is_empty())
}

/// Every legal `(from, to)` pair for the given color
pub fn all_legal_moves(
    board: &mut Board,
    color: Color,
    en_passant_target: Option<Square>,
) -> Vec<(Square, Square)> {
    let origins = board
        .pieces_of(color)
        .map(Piece::position)
        .collect::<Vec<_>>();
    origins
        .into_iter()
        .flat_map(|from| {
            legal_moves(board, from, en_passant_target)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}
