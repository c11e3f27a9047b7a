//! Castling eligibility
//!
//! Castling is only ever offered to a king which has never moved, standing on its home square
//! while not in check. The rook must be unmoved in its corner, the squares between them empty, and
//! neither the square the king passes over nor the one it lands on may be attacked.

use board::{Board, Color, Piece, PieceKind, Square};

use crate::attack::is_attacked;

const KING_HOME_COL: u8 = 4;

/// Which rook the king castles with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// King-side, with the rook on the h-file
    Short,
    /// Queen-side, with the rook on the a-file
    Long,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [Self::Short, Self::Long];

    const fn rook_col(self) -> u8 {
        match self {
            Self::Short => 7,
            Self::Long => 0,
        }
    }

    /// +1 for towards the h-file, -1 for towards the a-file
    const fn direction(self) -> i8 {
        match self {
            Self::Short => 1,
            Self::Long => -1,
        }
    }

    pub const fn king_origin(color: Color) -> Square {
        Square::from_row_col(color.home_row(), KING_HOME_COL)
    }

    /// Where the king lands, two columns from its home square
    pub const fn king_destination(self, color: Color) -> Square {
        Square::from_row_col(
            color.home_row(),
            (KING_HOME_COL as i8 + 2 * self.direction()) as u8,
        )
    }

    /// The square the king passes over, which is also where the rook lands
    pub const fn rook_destination(self, color: Color) -> Square {
        Square::from_row_col(
            color.home_row(),
            (KING_HOME_COL as i8 + self.direction()) as u8,
        )
    }

    pub const fn rook_origin(self, color: Color) -> Square {
        Square::from_row_col(color.home_row(), self.rook_col())
    }

    /// Recognize a king move from `from` to `to` as castling
    ///
    /// Only the geometry is checked: two columns along the home row, starting from the king's
    /// home square.
    pub fn from_king_move(color: Color, from: Square, to: Square) -> Option<Self> {
        if from != Self::king_origin(color) {
            return None;
        }
        Self::BOTH
            .into_iter()
            .find(|side| side.king_destination(color) == to)
    }
}

fn is_unmoved(board: &Board, square: Square, kind: PieceKind, color: Color) -> bool {
    board
        .get(square)
        .is_some_and(|piece| piece.kind == kind && piece.color == color && !piece.moved)
}

/// Whether `color` may castle on the given side right now
pub fn can_castle(board: &Board, color: Color, side: CastleSide) -> bool {
    let king = CastleSide::king_origin(color);
    if !is_unmoved(board, king, PieceKind::King, color)
        || !is_unmoved(board, side.rook_origin(color), PieceKind::Rook, color)
    {
        return false;
    }

    let (low, high) = match side {
        CastleSide::Short => (KING_HOME_COL + 1, side.rook_col()),
        CastleSide::Long => (side.rook_col() + 1, KING_HOME_COL),
    };
    let path_clear = (low..high).all(|col| board.is_empty(Square::from_row_col(color.home_row(), col)));
    if !path_clear {
        return false;
    }

    let enemy = color.other();
    [king, side.rook_destination(color), side.king_destination(color)]
        .into_iter()
        .all(|square| !is_attacked(board, square, enemy))
}

pub fn can_castle_short(board: &Board, color: Color) -> bool {
    can_castle(board, color, CastleSide::Short)
}

pub fn can_castle_long(board: &Board, color: Color) -> bool {
    can_castle(board, color, CastleSide::Long)
}

/// The destinations castling offers to the given king
pub(crate) fn castle_destinations(board: &Board, king: &Piece) -> Vec<Square> {
    if king.moved || king.position() != CastleSide::king_origin(king.color) {
        return Vec::new();
    }
    // Attacks on the king's own square rule out both sides, so check it only once
    if is_attacked(board, king.position(), king.color.other()) {
        return Vec::new();
    }
    CastleSide::BOTH
        .into_iter()
        .filter(|&side| can_castle(board, king.color, side))
        .map(|side| side.king_destination(king.color))
        .collect()
}
