//! The 8×8 grid of pieces

use core::fmt;

use crate::{Color, Piece, PieceKind, Square};

#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("expected 8 rows in the placement, found {0}")]
    WrongRowCount(usize),
    #[error("row {0} of the placement doesn't describe exactly 8 squares")]
    WrongRowLength(usize),
    #[error("unknown piece letter `{0}` in placement")]
    UnknownPiece(char),
}

const EMPTY_CELL: Option<Piece> = None;
const EMPTY_ROW: [Option<Piece>; 8] = [EMPTY_CELL; 8];

/// The pieces on a board, indexed by `[row][col]`
///
/// Every piece stored here has [`Piece::position`] equal to the cell holding it. All mutation
/// goes through [`Board::put`] and [`Board::take`], which keep that in sync.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces on it
    pub const fn empty() -> Self {
        Self {
            cells: [EMPTY_ROW; 8],
        }
    }

    /// The position at the start of a chess game
    pub fn standard() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            for (col, kind) in BACK_RANK.into_iter().enumerate() {
                let col = col as u8;
                board.put(
                    Square::from_row_col(color.home_row(), col),
                    Piece::new(kind, color),
                );
                board.put(
                    Square::from_row_col(color.pawn_row(), col),
                    Piece::new(PieceKind::Pawn, color),
                );
            }
        }
        board
    }

    /// Parse the piece-placement field of a FEN string
    ///
    /// The first row given is row 0 (black's back rank). Kings and rooks count as unmoved only
    /// when they stand where they start the game.
    ///
    /// ```
    /// # use board::Board;
    /// let board = Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
    /// assert_eq!(board, Board::standard());
    /// ```
    pub fn from_placement(placement: &str) -> Result<Self, PlacementError> {
        let rows = placement.split('/').collect::<Vec<_>>();
        if rows.len() != 8 {
            return Err(PlacementError::WrongRowCount(rows.len()));
        }
        let mut board = Self::empty();
        for (row, text) in rows.into_iter().enumerate() {
            let mut col = 0u32;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip;
                    continue;
                }
                let kind = PieceKind::from_fen_letter(c).ok_or(PlacementError::UnknownPiece(c))?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if col >= 8 {
                    return Err(PlacementError::WrongRowLength(row));
                }
                let square = Square::from_row_col(row as u8, col as u8);
                board.put(square, Piece::new(kind, color));
                if let Some(piece) = board.get_mut(square) {
                    piece.moved = !piece.is_on_starting_square();
                }
                col += 1;
            }
            if col != 8 {
                return Err(PlacementError::WrongRowLength(row));
            }
        }
        Ok(board)
    }

    /// The piece-placement field of FEN for this board
    pub fn placement(&self) -> String {
        let rows = self
            .cells
            .iter()
            .map(|row| {
                let mut text = String::with_capacity(8);
                let mut empty = 0;
                for cell in row {
                    match cell {
                        Some(piece) => {
                            if empty > 0 {
                                text.push_str(&empty.to_string());
                                empty = 0;
                            }
                            text.push(piece.fen_letter());
                        }
                        None => empty += 1,
                    }
                }
                if empty > 0 {
                    text.push_str(&empty.to_string());
                }
                text
            })
            .collect::<Vec<String>>();
        rows.join("/")
    }

    /// Find the piece, if any, at the given square
    ///
    /// Returns `None` if the given square is invalid.
    pub fn get(&self, square: Square) -> Option<&Piece> {
        let (row, col) = square.to_row_col()?;
        self.cells[row as usize][col as usize].as_ref()
    }

    /// Like [`Board::get`], but mutable
    ///
    /// The position of the piece can't be changed through this reference.
    pub fn get_mut(&mut self, square: Square) -> Option<&mut Piece> {
        let (row, col) = square.to_row_col()?;
        self.cells[row as usize][col as usize].as_mut()
    }

    /// Whether the given square is on the board and unoccupied
    pub fn is_empty(&self, square: Square) -> bool {
        square.is_valid() && self.get(square).is_none()
    }

    /// The color of the piece at the given square, if any
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.get(square).map(|piece| piece.color)
    }

    /// Place the piece at the given square, returning whatever was there before
    ///
    /// # Panics
    /// If the square isn't on the board.
    pub fn put(&mut self, square: Square, mut piece: Piece) -> Option<Piece> {
        let Some((row, col)) = square.to_row_col() else {
            panic!("attempted to place {piece:?} on invalid square {square:?}");
        };
        piece.position = square;
        self.cells[row as usize][col as usize].replace(piece)
    }

    /// Remove and return the piece at the given square
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        let (row, col) = square.to_row_col()?;
        self.cells[row as usize][col as usize].take()
    }

    /// Move the piece on `from` to `to`, returning the piece which was standing on `to`
    ///
    /// # Panics
    /// If there is no piece on `from`.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let Some(piece) = self.take(from) else {
            panic!("no piece to relocate from {from}");
        };
        self.put(to, piece)
    }

    /// An iterator over every piece on the board, row by row
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten().flatten()
    }

    /// An iterator over the pieces of the given color
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = &Piece> {
        self.pieces().filter(move |piece| piece.color == color)
    }

    /// Get the square on which the given player's king resides
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|piece| piece.kind == PieceKind::King)
            .map(Piece::position)
    }

    /// Whether every piece's stored position matches the cell holding it
    pub fn positions_in_sync(&self) -> bool {
        Square::all_squares().all(|square| {
            self.get(square)
                .map_or(true, |piece| piece.position() == square)
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

/// Draws the board with white at the bottom, e.g. for the terminal
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{} ", 8 - row)?;
            for cell in cells {
                let letter = cell.as_ref().map_or('.', Piece::fen_letter);
                write!(f, " {letter}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board({})", self.placement())?;
        write!(f, "{self}")
    }
}
