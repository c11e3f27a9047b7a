use board::{Board, Color, Piece, PieceKind, Square};

use crate::movement::Movement;

/// Whether any piece of color `by` attacks the given square
///
/// The opposing king counts by plain adjacency instead of through its move generation, which
/// would otherwise have to ask this function about castling squares again.
pub fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    board.pieces_of(by).any(|piece| attacks(board, piece, square))
}

/// The squares of every piece of color `by` attacking the given square
pub fn attackers(board: &Board, square: Square, by: Color) -> Vec<Square> {
    board
        .pieces_of(by)
        .filter(|piece| attacks(board, piece, square))
        .map(Piece::position)
        .collect()
}

fn attacks(board: &Board, piece: &Piece, square: Square) -> bool {
    match piece.kind {
        PieceKind::King => square.offset_from(piece.position()).chebyshev_distance() == 1,
        _ => piece.attack_squares(board).contains(&square),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_attacks() {
        let board = Board::standard();
        assert!(is_attacked(&board, Square::F3, Color::White));
        assert!(is_attacked(&board, Square::E2, Color::White));
        assert!(!is_attacked(&board, Square::E4, Color::White));
        assert!(is_attacked(&board, Square::C6, Color::Black));
        assert!(!is_attacked(&board, Square::E5, Color::Black));
    }

    #[test]
    fn test_pawns_attack_diagonally_only() {
        let board = Board::from_placement("4k3/8/8/8/8/8/4P3/4K3").unwrap();
        assert!(is_attacked(&board, Square::D3, Color::White));
        assert!(is_attacked(&board, Square::F3, Color::White));
        assert!(!is_attacked(&board, Square::E3, Color::White));
        assert!(!is_attacked(&board, Square::E4, Color::White));
    }

    #[test]
    fn test_king_adjacency() {
        let board = Board::from_placement("8/8/8/3k4/8/8/8/4K3").unwrap();
        assert!(is_attacked(&board, Square::E4, Color::Black));
        assert!(is_attacked(&board, Square::C6, Color::Black));
        assert!(!is_attacked(&board, Square::D5, Color::Black));
        assert!(!is_attacked(&board, Square::F5, Color::Black));
        assert_eq!(attackers(&board, Square::E2, Color::White), vec![Square::E1]);
    }

    #[test]
    fn test_sliders_are_blocked() {
        let board = Board::from_placement("4k3/8/8/8/4p3/8/8/4RK2").unwrap();
        assert!(is_attacked(&board, Square::E4, Color::White));
        assert!(!is_attacked(&board, Square::E8, Color::White));
        assert!(attackers(&board, Square::E8, Color::White).is_empty());
    }

    #[test]
    fn test_multiple_attackers() {
        let board = Board::from_placement("4k3/8/8/8/8/5N2/8/R3K3").unwrap();
        let mut found = attackers(&board, Square::D1, Color::White);
        found.sort_by_key(|square| square.0);
        assert_eq!(found, vec![Square::A1, Square::E1]);
        let mut found = attackers(&board, Square::D2, Color::White);
        found.sort_by_key(|square| square.0);
        assert_eq!(found, vec![Square::F3, Square::E1]);
    }
}
