//! How each kind of piece moves

use board::{Board, Color, Piece, PieceKind, Square, SquareOffset};

use crate::castling;

/// Move generation shared by every kind of piece
///
/// Neither method considers whether the move would leave the mover's own king attacked; that is
/// the job of [`crate::legality`].
pub trait Movement {
    /// The squares this piece threatens
    ///
    /// This is only used to find out whether a square is attacked, never to decide which moves
    /// are legal. Pawns threaten only their forward diagonals, and sliding pieces threaten the
    /// first occupied square along each ray whatever its color.
    fn attack_squares(&self, board: &Board) -> Vec<Square>;

    /// The squares this piece could move to, including captures and castling
    fn candidate_moves(&self, board: &Board, en_passant_target: Option<Square>) -> Vec<Square>;
}

impl Movement for Piece {
    fn attack_squares(&self, board: &Board) -> Vec<Square> {
        let from = self.position();
        match self.kind {
            PieceKind::Pawn => pawn_diagonals(self.color, from).collect(),
            PieceKind::Knight => steps(from, &SquareOffset::KNIGHT_MOVES).collect(),
            PieceKind::King => steps(from, &SquareOffset::KING_MOVES).collect(),
            PieceKind::Rook => rays(board, from, &SquareOffset::ROOK_DIRECTIONS, None),
            PieceKind::Bishop => rays(board, from, &SquareOffset::BISHOP_DIRECTIONS, None),
            PieceKind::Queen => rays(board, from, &SquareOffset::QUEEN_DIRECTIONS, None),
        }
    }

    fn candidate_moves(&self, board: &Board, en_passant_target: Option<Square>) -> Vec<Square> {
        let from = self.position();
        let own = Some(self.color);
        match self.kind {
            PieceKind::Pawn => pawn_moves(board, self, en_passant_target),
            PieceKind::Knight => steps(from, &SquareOffset::KNIGHT_MOVES)
                .filter(|&to| board.color_at(to) != own)
                .collect(),
            PieceKind::King => {
                let mut moves = steps(from, &SquareOffset::KING_MOVES)
                    .filter(|&to| board.color_at(to) != own)
                    .collect::<Vec<_>>();
                moves.extend(castling::castle_destinations(board, self));
                moves
            }
            PieceKind::Rook => rays(board, from, &SquareOffset::ROOK_DIRECTIONS, own),
            PieceKind::Bishop => rays(board, from, &SquareOffset::BISHOP_DIRECTIONS, own),
            PieceKind::Queen => rays(board, from, &SquareOffset::QUEEN_DIRECTIONS, own),
        }
    }
}

/// If moving the piece on `from` to `to` is an en passant capture, the square of the pawn it
/// captures
///
/// The captured pawn stands beside the mover, on the destination's column, not on the
/// destination itself.
pub fn en_passant_victim(
    board: &Board,
    from: Square,
    to: Square,
    en_passant_target: Option<Square>,
) -> Option<Square> {
    let mover = board.get(from)?;
    if mover.kind != PieceKind::Pawn || en_passant_target != Some(to) || from.col() == to.col() {
        return None;
    }
    let victim = Square::from_row_col(from.row(), to.col());
    board
        .get(victim)
        .is_some_and(|piece| piece.kind == PieceKind::Pawn && piece.color != mover.color)
        .then_some(victim)
}

/// The on-board squares reached by applying each offset once
fn steps(from: Square, offsets: &[SquareOffset]) -> impl Iterator<Item = Square> + '_ {
    offsets
        .iter()
        .map(move |offset| offset.offset(from))
        .filter(|square| square.is_valid())
}

/// Cast a ray along each direction, one square at a time
///
/// An empty square is added and the ray continues. An occupied square is added unless it holds a
/// piece of color `own`, and ends the ray either way. Pass `own = None` to include the first
/// blocker of any color, which is what attack detection wants.
fn rays(board: &Board, from: Square, directions: &[SquareOffset], own: Option<Color>) -> Vec<Square> {
    let mut squares = Vec::new();
    for direction in directions {
        let mut square = direction.offset(from);
        while square.is_valid() {
            match board.color_at(square) {
                None => squares.push(square),
                Some(color) => {
                    if Some(color) != own {
                        squares.push(square);
                    }
                    break;
                }
            }
            square = direction.offset(square);
        }
    }
    squares
}

fn pawn_diagonals(color: Color, from: Square) -> impl Iterator<Item = Square> {
    [-1, 1]
        .into_iter()
        .map(move |col| from.offset(color.forward(), col))
        .filter(|square| square.is_valid())
}

fn pawn_moves(board: &Board, pawn: &Piece, en_passant_target: Option<Square>) -> Vec<Square> {
    let from = pawn.position();
    let forward = pawn.color.forward();
    let mut moves = Vec::with_capacity(4);

    let one = from.offset(forward, 0);
    if board.is_empty(one) {
        moves.push(one);
        let two = from.offset(2 * forward, 0);
        if from.row() == pawn.color.pawn_row() && board.is_empty(two) {
            moves.push(two);
        }
    }

    for to in pawn_diagonals(pawn.color, from) {
        let captures = match board.color_at(to) {
            Some(color) => color != pawn.color,
            None => en_passant_victim(board, from, to, en_passant_target).is_some(),
        };
        if captures {
            moves.push(to);
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn assert_squares(mut actual: Vec<Square>, expected: &[Square]) {
        let mut expected = expected.to_vec();
        actual.sort_by_key(|square| square.0);
        expected.sort_by_key(|square| square.0);
        assert_eq!(actual, expected);
    }

    fn candidates(board: &Board, square: Square, en_passant: Option<Square>) -> Vec<Square> {
        board.get(square).unwrap().candidate_moves(board, en_passant)
    }

    #[test]
    fn test_opening_pawn_moves() {
        let board = Board::standard();
        assert_squares(candidates(&board, Square::E2, None), &[Square::E3, Square::E4]);
        assert_squares(candidates(&board, Square::D7, None), &[Square::D6, Square::D5]);
    }

    #[test]
    fn test_opening_knight_moves() {
        let board = Board::standard();
        assert_squares(candidates(&board, Square::G1, None), &[Square::F3, Square::H3]);
        assert_squares(candidates(&board, Square::B8, None), &[Square::A6, Square::C6]);
    }

    #[test]
    fn test_blocked_pieces_have_no_moves() {
        let board = Board::standard();
        for square in [Square::A1, Square::C1, Square::D1, Square::E1, Square::F8] {
            assert_squares(candidates(&board, square, None), &[]);
        }
    }

    #[test]
    fn test_pawn_double_step_needs_both_squares_empty() {
        let board = Board::from_placement("4k3/8/8/8/8/4n3/4P3/4K3").unwrap();
        assert_squares(candidates(&board, Square::E2, None), &[]);
        let board = Board::from_placement("4k3/8/8/8/4n3/8/4P3/4K3").unwrap();
        assert_squares(candidates(&board, Square::E2, None), &[Square::E3]);
    }

    #[test]
    fn test_pawn_captures_and_attacks() {
        let board = Board::from_placement("4k3/8/8/8/8/3p1P2/4P3/4K3").unwrap();
        assert_squares(
            candidates(&board, Square::E2, None),
            &[Square::E3, Square::E4, Square::D3],
        );
        // Attacks include the friendly-occupied diagonal but never the pushes
        assert_squares(
            board.get(Square::E2).unwrap().attack_squares(&board),
            &[Square::D3, Square::F3],
        );
    }

    #[test]
    fn test_en_passant_candidate() {
        // Black pawn on d4, white pawn just went e2-e4
        let board = Board::from_placement("4k3/8/8/8/3pP3/8/8/4K3").unwrap();
        assert_squares(
            candidates(&board, Square::D4, Some(Square::E3)),
            &[Square::D3, Square::E3],
        );
        assert_squares(candidates(&board, Square::D4, None), &[Square::D3]);
        assert_eq!(
            en_passant_victim(&board, Square::D4, Square::E3, Some(Square::E3)),
            Some(Square::E4)
        );
        assert_eq!(en_passant_victim(&board, Square::D4, Square::D3, Some(Square::E3)), None);
    }

    #[test]
    fn test_sliders_stop_at_blockers() {
        let board = Board::from_placement("4k3/8/8/1p6/8/8/1R2P3/4K3").unwrap();
        // Up the b-file until capturing on b5, right until the own pawn on e2
        assert_squares(
            candidates(&board, Square::B2, None),
            &[
                Square::B3,
                Square::B4,
                Square::B5,
                Square::B1,
                Square::A2,
                Square::C2,
                Square::D2,
            ],
        );
        // Attack rays also cover the friendly blocker
        let attacks = board.get(Square::B2).unwrap().attack_squares(&board);
        assert!(attacks.contains(&Square::E2));
        assert!(!attacks.contains(&Square::F2));
        assert!(!attacks.contains(&Square::B6));
    }

    #[test]
    fn test_queen_in_open_board() {
        let board = Board::from_placement("k7/8/8/8/3Q4/8/8/7K").unwrap();
        // 27 squares from d4 on an empty board
        assert_eq!(candidates(&board, Square::D4, None).len(), 27);
    }

    #[test]
    fn test_king_steps_avoid_own_pieces() {
        let board = Board::from_placement("4k3/8/8/8/8/8/3PP3/3QK3").unwrap();
        assert_squares(candidates(&board, Square::E1, None), &[Square::F1, Square::F2]);
    }
}
