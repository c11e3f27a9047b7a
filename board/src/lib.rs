use core::{fmt, str::FromStr};

mod grid;

pub use grid::{Board, PlacementError};

/// The types of pieces there are
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}
impl PieceKind {
    /// The kinds a pawn may promote into, in the order they're usually offered
    pub const PROMOTIONS: [PieceKind; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// The capitalized version of the letter used for this piece in FEN
    pub const fn fen_letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Parse a FEN letter of either case
    pub const fn from_fen_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'P' => Some(Self::Pawn),
            'R' => Some(Self::Rook),
            'N' => Some(Self::Knight),
            'B' => Some(Self::Bishop),
            'Q' => Some(Self::Queen),
            'K' => Some(Self::King),
            _ => None,
        }
    }

    /// The kind chosen by pressing the given key when asked what to promote into
    ///
    /// ```
    /// # use board::PieceKind;
    /// assert_eq!(PieceKind::from_promotion_key('n'), Some(PieceKind::Knight));
    /// assert_eq!(PieceKind::from_promotion_key('K'), None);
    /// ```
    pub const fn from_promotion_key(key: char) -> Option<Self> {
        match Self::from_fen_letter(key) {
            Some(kind) if kind.is_promotable() => Some(kind),
            _ => None,
        }
    }

    /// Whether a pawn can promote into this kind of piece
    pub const fn is_promotable(self) -> bool {
        match self {
            PieceKind::Pawn | PieceKind::King => false,
            PieceKind::Rook | PieceKind::Queen | PieceKind::Knight | PieceKind::Bishop => true,
        }
    }

    /// Whether this piece moves along rays until blocked
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Bishop | PieceKind::Queen)
    }
}

/// The colors a piece can have
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The row this side's pieces start on
    pub const fn home_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The row this side's pawns start on
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// The row on which this side's pawns promote
    pub const fn promotion_row(self) -> u8 {
        self.other().home_row()
    }

    /// The row delta of a forward pawn step
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A piece standing on the board
///
/// A piece is owned by the board cell holding it, so this type is not [`Copy`]. Its
/// position can only be changed by placing it on a [`Board`], which keeps the stored position
/// and the cell in agreement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    /// Whether this piece has ever moved
    ///
    /// Only castling reads this, so it only matters for kings and rooks.
    pub moved: bool,
    position: Square,
}
impl Piece {
    /// A piece which hasn't been placed on a board yet
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            moved: false,
            position: Square::INVALID,
        }
    }

    /// The square this piece stands on
    pub const fn position(&self) -> Square {
        self.position
    }

    pub const fn fen_letter(&self) -> char {
        match self.color {
            Color::White => self.kind.fen_letter().to_ascii_uppercase(),
            Color::Black => self.kind.fen_letter().to_ascii_lowercase(),
        }
    }

    /// Whether this piece is on a square where its kind starts the game
    pub fn is_on_starting_square(&self) -> bool {
        let Some((row, col)) = self.position.to_row_col() else {
            return false;
        };
        match self.kind {
            PieceKind::Pawn => row == self.color.pawn_row(),
            PieceKind::Rook => row == self.color.home_row() && (col == 0 || col == 7),
            PieceKind::Knight => row == self.color.home_row() && (col == 1 || col == 6),
            PieceKind::Bishop => row == self.color.home_row() && (col == 2 || col == 5),
            PieceKind::Queen => row == self.color.home_row() && col == 3,
            PieceKind::King => row == self.color.home_row() && col == 4,
        }
    }
}

/// The possible outcomes of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    /// The winner checkmated the other side
    Checkmate { winner: Color },
    /// Draw because the side to move couldn't make any moves, but wasn't in check
    Stalemate,
}
impl GameOutcome {
    pub const fn winner(self) -> Option<Color> {
        match self {
            Self::Checkmate { winner } => Some(winner),
            Self::Stalemate => None,
        }
    }

    pub const fn loser(self) -> Option<Color> {
        match self {
            Self::Checkmate { winner } => Some(winner.other()),
            Self::Stalemate => None,
        }
    }
}
impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate {
                winner: Color::White,
            } => f.write_str("Checkmate! White wins!"),
            Self::Checkmate {
                winner: Color::Black,
            } => f.write_str("Checkmate! Black wins!"),
            Self::Stalemate => f.write_str("Stalemate!"),
        }
    }
}

/// A square on the board
///
/// Stored in 0x88 method:
/// ```text
/// 0b12345678
///        +-+ Column
///    +-+ Row
///   +   + Must be zero, invalid position if 1
/// ```
///
/// Row 0 is black's back rank and row 7 is white's, while column 0 is the a-file. Each square is
/// represented in one byte, and this format makes it easy to do operations and check if the
/// resulting square is valid and on the board.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square(pub u8);
impl Square {
    /// An invalid square
    ///
    /// Please use this instead of making your own so it's obvious if a deliberately-invalid square
    /// appeared.
    pub const INVALID: Self = Self(0xee);

    pub const A8: Self = Self(0x00);
    pub const B8: Self = Self(0x01);
    pub const C8: Self = Self(0x02);
    pub const D8: Self = Self(0x03);
    pub const E8: Self = Self(0x04);
    pub const F8: Self = Self(0x05);
    pub const G8: Self = Self(0x06);
    pub const H8: Self = Self(0x07);
    pub const A7: Self = Self(0x10);
    pub const B7: Self = Self(0x11);
    pub const C7: Self = Self(0x12);
    pub const D7: Self = Self(0x13);
    pub const E7: Self = Self(0x14);
    pub const F7: Self = Self(0x15);
    pub const G7: Self = Self(0x16);
    pub const H7: Self = Self(0x17);
    pub const A6: Self = Self(0x20);
    pub const B6: Self = Self(0x21);
    pub const C6: Self = Self(0x22);
    pub const D6: Self = Self(0x23);
    pub const E6: Self = Self(0x24);
    pub const F6: Self = Self(0x25);
    pub const G6: Self = Self(0x26);
    pub const H6: Self = Self(0x27);
    pub const A5: Self = Self(0x30);
    pub const B5: Self = Self(0x31);
    pub const C5: Self = Self(0x32);
    pub const D5: Self = Self(0x33);
    pub const E5: Self = Self(0x34);
    pub const F5: Self = Self(0x35);
    pub const G5: Self = Self(0x36);
    pub const H5: Self = Self(0x37);
    pub const A4: Self = Self(0x40);
    pub const B4: Self = Self(0x41);
    pub const C4: Self = Self(0x42);
    pub const D4: Self = Self(0x43);
    pub const E4: Self = Self(0x44);
    pub const F4: Self = Self(0x45);
    pub const G4: Self = Self(0x46);
    pub const H4: Self = Self(0x47);
    pub const A3: Self = Self(0x50);
    pub const B3: Self = Self(0x51);
    pub const C3: Self = Self(0x52);
    pub const D3: Self = Self(0x53);
    pub const E3: Self = Self(0x54);
    pub const F3: Self = Self(0x55);
    pub const G3: Self = Self(0x56);
    pub const H3: Self = Self(0x57);
    pub const A2: Self = Self(0x60);
    pub const B2: Self = Self(0x61);
    pub const C2: Self = Self(0x62);
    pub const D2: Self = Self(0x63);
    pub const E2: Self = Self(0x64);
    pub const F2: Self = Self(0x65);
    pub const G2: Self = Self(0x66);
    pub const H2: Self = Self(0x67);
    pub const A1: Self = Self(0x70);
    pub const B1: Self = Self(0x71);
    pub const C1: Self = Self(0x72);
    pub const D1: Self = Self(0x73);
    pub const E1: Self = Self(0x74);
    pub const F1: Self = Self(0x75);
    pub const G1: Self = Self(0x76);
    pub const H1: Self = Self(0x77);

    /// Returns if this square is valid
    ///
    /// ```
    /// # use board::Square;
    /// assert!(!Square::INVALID.is_valid());
    /// assert!(Square::E2.is_valid());
    /// ```
    pub const fn is_valid(self) -> bool {
        self.0 & 0x88 == 0
    }

    /// Produce a square from the row and column, returning [`Self::INVALID`] if they are not on
    /// the board.
    ///
    /// ```
    /// # use board::Square;
    /// assert_eq!(Square::from_row_col(6, 4), Square::E2);
    /// assert_eq!(Square::from_row_col(8, 0), Square::INVALID);
    /// ```
    pub const fn from_row_col(row: u8, col: u8) -> Self {
        if row < 8 && col < 8 {
            Self(row << 4 | col)
        } else {
            Self::INVALID
        }
    }

    /// Returns the `(row, col)` tuple if this square is valid
    pub const fn to_row_col(self) -> Option<(u8, u8)> {
        if self.is_valid() {
            Some((self.0 >> 4, self.0 & 0x07))
        } else {
            None
        }
    }

    /// The row of this square
    ///
    /// Meaningless for an invalid square.
    pub const fn row(self) -> u8 {
        (self.0 >> 4) & 0x07
    }

    /// The column of this square
    ///
    /// Meaningless for an invalid square.
    pub const fn col(self) -> u8 {
        self.0 & 0x07
    }

    /// Offset the given number of rows and columns.
    ///
    /// Positive rows move towards white's side, while positive columns move towards the h-file.
    ///
    /// ```rust
    /// use board::Square;
    /// assert_eq!(Square::E4, Square::E2.offset(-2, 0));
    /// assert_eq!(Square::A1, Square::D2.offset(1, -3));
    /// assert_eq!(Square::F7, Square::F7.offset(0, 0));
    /// assert!(!Square::D8.offset(-1, 0).is_valid());
    /// assert!(!Square::D1.offset(1, 0).is_valid());
    /// assert!(!Square::A4.offset(0, -1).is_valid());
    /// assert!(!Square::H4.offset(0, 1).is_valid());
    /// ```
    pub const fn offset(self, rows: i8, cols: i8) -> Self {
        SquareOffset::from_row_col(rows, cols).offset(self)
    }

    /// An iterator over all valid squares on the board, row by row
    ///
    /// ```
    /// assert_eq!(board::Square::all_squares().count(), 64);
    /// ```
    pub fn all_squares() -> impl Iterator<Item = Self> {
        (0..64u8).map(|idx| Self::from_row_col(idx >> 3, idx & 0x07))
    }

    /// Gets the offset from `other` to this square
    ///
    /// If either input is invalid, then the resulting offset is [`SquareOffset::INVALID`].
    pub const fn offset_from(self, other: Self) -> SquareOffset {
        let (Some((self_row, self_col)), Some((other_row, other_col))) =
            (self.to_row_col(), other.to_row_col())
        else {
            return SquareOffset::INVALID;
        };
        SquareOffset::from_row_col(
            self_row as i8 - other_row as i8,
            self_col as i8 - other_col as i8,
        )
    }
}
impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_row_col() {
            Some((row, col)) => write!(f, "Square({row}, {col} = {self})"),
            None => write!(f, "Square(illegal {:X})", self.0),
        }
    }
}
/// Writes the algebraic name of the square, e.g. `e2` for `(6, 4)`
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_row_col() {
            Some((row, col)) => write!(f, "{}{}", (b'a' + col) as char, (b'8' - row) as char),
            None => f.write_str("XX"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("board position string was invalid")]
pub struct SquareParseError;

/// Accepts either an algebraic name (`e2`) or a `row,col` pair (`6,4`)
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((row, col)) = s.split_once(',') {
            let row = row.trim().parse::<u8>().map_err(|_| SquareParseError)?;
            let col = col.trim().parse::<u8>().map_err(|_| SquareParseError)?;
            let square = Self::from_row_col(row, col);
            return if square.is_valid() {
                Ok(square)
            } else {
                Err(SquareParseError)
            };
        }
        let &[file, rank] = s.as_bytes() else {
            return Err(SquareParseError);
        };
        let col = match file.to_ascii_lowercase() {
            c @ b'a'..=b'h' => c - b'a',
            _ => return Err(SquareParseError),
        };
        let row = match rank {
            r @ b'1'..=b'8' => b'8' - r,
            _ => return Err(SquareParseError),
        };
        Ok(Self::from_row_col(row, col))
    }
}

/// An offset on a board
///
/// This struct stores any possible offset in both row and column between any two squares, using
/// only one byte of space.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SquareOffset(u8);
impl SquareOffset {
    /// The offsets corresponding to all possible knight moves
    pub const KNIGHT_MOVES: [SquareOffset; 8] = [
        Self::from_row_col(-2, -1),
        Self::from_row_col(-2, 1),
        Self::from_row_col(-1, -2),
        Self::from_row_col(-1, 2),
        Self::from_row_col(1, -2),
        Self::from_row_col(1, 2),
        Self::from_row_col(2, -1),
        Self::from_row_col(2, 1),
    ];

    /// The offsets corresponding to all possible king moves
    pub const KING_MOVES: [SquareOffset; 8] = [
        Self::from_row_col(-1, -1),
        Self::from_row_col(-1, 0),
        Self::from_row_col(-1, 1),
        Self::from_row_col(0, -1),
        Self::from_row_col(0, 1),
        Self::from_row_col(1, -1),
        Self::from_row_col(1, 0),
        Self::from_row_col(1, 1),
    ];

    /// The directions a rook slides along
    pub const ROOK_DIRECTIONS: [SquareOffset; 4] = [
        Self::from_row_col(-1, 0),
        Self::from_row_col(1, 0),
        Self::from_row_col(0, -1),
        Self::from_row_col(0, 1),
    ];

    /// The directions a bishop slides along
    pub const BISHOP_DIRECTIONS: [SquareOffset; 4] = [
        Self::from_row_col(-1, -1),
        Self::from_row_col(-1, 1),
        Self::from_row_col(1, -1),
        Self::from_row_col(1, 1),
    ];

    /// The directions a queen slides along
    pub const QUEEN_DIRECTIONS: [SquareOffset; 8] = Self::KING_MOVES;

    /// This is an invalid offset that, when applied to any [`Square`], invalidates it.
    pub const INVALID: Self = Self(0x88);

    /// Produce a new offset from the given row and column amounts
    ///
    /// In debug mode, we assert that the row and column are both on the interval [-7,7] (which
    /// are the only possible offsets). In release mode, we wrap modulo 16 and allow for -8, which
    /// invalidates any square.
    pub const fn from_row_col(row: i8, col: i8) -> Self {
        debug_assert!(-8 < row && row < 8);
        debug_assert!(-8 < col && col < 8);
        Self(((row as u8) << 4) & 0xF0 | (col as u8) & 0x0F)
    }

    /// Offset the given square
    ///
    /// If the square is already invalid, then the same square is returned unchanged.
    pub const fn offset(self, square: Square) -> Square {
        if square.is_valid() {
            Square(((self.0 & 0x77) + square.0) ^ (self.0 & 0x88))
        } else {
            square
        }
    }

    /// Gets the signed number of columns associated with this offset
    pub const fn col(self) -> i8 {
        (self.0 as i8) << 4 >> 4
    }

    /// Gets the signed number of rows associated with this offset
    pub const fn row(self) -> i8 {
        (self.0 as i8) >> 4
    }

    /// Gets the Chebyshev distance for this offset
    ///
    /// This is the number of squares moved in one direction, for whichever direction is larger.
    pub const fn chebyshev_distance(self) -> u8 {
        let row = self.row().unsigned_abs();
        let col = self.col().unsigned_abs();
        if row > col {
            row
        } else {
            col
        }
    }
}
impl fmt::Debug for SquareOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SquareOffset")
            .field("row", &self.row())
            .field("col", &self.col())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quickcheck::{quickcheck, Arbitrary, Gen};

    impl Arbitrary for Square {
        fn arbitrary(g: &mut Gen) -> Self {
            Self(u8::arbitrary(g))
        }
    }

    macro_rules! test_valid_squares {
        ($(
            $name:ident($square:pat) $body:block
        )*) => {$(
            #[test]
            fn $name() {
                for $square in Square::all_squares() {
                    $body
                }
            }
        )*};
    }

    test_valid_squares!(
        test_square_name_round_trip(square) { assert_eq!(square, square.to_string().parse::<Square>().unwrap()) }
        test_square_row_col_round_trip(square) {
            let (row, col) = square.to_row_col().unwrap();
            assert_eq!(square, Square::from_row_col(row, col));
            assert_eq!(square, format!("{row},{col}").parse::<Square>().unwrap());
        }
    );

    quickcheck! {
        fn test_offset_stays_on_board_or_invalidates(square: Square, row: i8, col: i8) -> bool {
            let (row, col) = (row % 8, col % 8);
            let moved = square.offset(row, col);
            match square.to_row_col() {
                None => moved == square,
                Some((r, c)) => {
                    let (r, c) = (r as i8 + row, c as i8 + col);
                    let on_board = (0..8).contains(&r) && (0..8).contains(&c);
                    moved.is_valid() == on_board
                        && (!on_board || moved == Square::from_row_col(r as u8, c as u8))
                }
            }
        }
    }

    #[test]
    fn test_offset_row_col() {
        for row in -7..=7 {
            for col in -7..=7 {
                let offset = SquareOffset::from_row_col(row, col);
                assert_eq!(offset.row(), row);
                assert_eq!(offset.col(), col);
            }
        }
    }

    #[test]
    fn test_offset_from_inverts_offset() {
        assert_eq!(Square::E4.offset_from(Square::E2), SquareOffset::from_row_col(-2, 0));
        assert_eq!(Square::G1.offset_from(Square::E1).chebyshev_distance(), 2);
        assert_eq!(Square::E2.offset_from(Square::INVALID), SquareOffset::INVALID);
    }

    #[test]
    fn test_rejects_bad_square_names() {
        for name in ["", "e", "e9", "i1", "e22", "8,0", "0,8", "x,1"] {
            assert!(name.parse::<Square>().is_err(), "{name} should not parse");
        }
    }

    #[test]
    fn test_promotion_keys() {
        assert_eq!(PieceKind::from_promotion_key('Q'), Some(PieceKind::Queen));
        assert_eq!(PieceKind::from_promotion_key('r'), Some(PieceKind::Rook));
        assert_eq!(PieceKind::from_promotion_key('B'), Some(PieceKind::Bishop));
        assert_eq!(PieceKind::from_promotion_key('N'), Some(PieceKind::Knight));
        assert_eq!(PieceKind::from_promotion_key('P'), None);
        assert_eq!(PieceKind::from_promotion_key('x'), None);
    }

    #[test]
    fn test_outcome_sides() {
        let mate = GameOutcome::Checkmate {
            winner: Color::Black,
        };
        assert_eq!(mate.winner(), Some(Color::Black));
        assert_eq!(mate.loser(), Some(Color::White));
        assert_eq!(mate.to_string(), "Checkmate! Black wins!");
        assert_eq!(GameOutcome::Stalemate.winner(), None);
        assert_eq!(GameOutcome::Stalemate.loser(), None);
    }
}
