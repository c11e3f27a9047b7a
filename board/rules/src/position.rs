use board::{Board, Color, GameOutcome, Piece, PieceKind, Square};
use tracing::{debug, info};
use utils::{invariant, InvariantExpect};

use crate::{
    attack,
    castling::{self, CastleSide},
    legality,
    movement::{self, Movement},
    Error, GameState, Rejection, Result,
};

/// What became of a requested move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was made and the turn passed
    Applied {
        /// Whether the side now to move is in check
        check: bool,
    },
    /// Nothing changed
    Rejected(Rejection),
    /// The move was made, but the pawn now on `square` must be promoted before the turn passes
    PromotionPending { square: Square },
    Checkmate { winner: Color, loser: Color },
    Stalemate,
}

impl MoveOutcome {
    pub const fn is_rejected(self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The end of the game this outcome brought about, if any
    pub const fn game_outcome(self) -> Option<GameOutcome> {
        match self {
            Self::Checkmate { winner, .. } => Some(GameOutcome::Checkmate { winner }),
            Self::Stalemate => Some(GameOutcome::Stalemate),
            _ => None,
        }
    }
}

/// A board together with the state of the game played on it
///
/// All moves go through [`Position::apply_move`], which refuses anything illegal, so the pair
/// always describes a position reachable under the rules from where it started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: Board,
    state: GameState,
}

impl Position {
    /// The starting position of a game, white to move
    pub fn new() -> Self {
        Self {
            board: Board::standard(),
            state: GameState::new(),
        }
    }

    /// Start from the given placement with `turn` to move
    ///
    /// Whether that side is in check, or already has no moves, is worked out immediately.
    ///
    /// ```
    /// # use rules::{Color, Position};
    /// let position = Position::from_placement("7k/5Q2/6K1/8/8/8/8/8", Color::Black).unwrap();
    /// assert!(position.is_game_over());
    /// assert_eq!(position.outcome(), Some(rules::GameOutcome::Stalemate));
    /// ```
    pub fn from_placement(placement: &str, turn: Color) -> Result<Self> {
        let board = Board::from_placement(placement)?;
        Self::from_board(board, turn)
    }

    /// Start from the given board with `turn` to move
    ///
    /// Each side needs exactly one king, and the side which just moved mustn't be in check.
    pub fn from_board(board: Board, turn: Color) -> Result<Self> {
        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces_of(color)
                .filter(|piece| piece.kind == PieceKind::King)
                .count();
            match kings {
                0 => return Err(Error::MissingKing(color)),
                1 => {}
                _ => return Err(Error::ExtraKing(color)),
            }
        }
        let mut position = Self {
            board,
            state: GameState::with_turn(turn),
        };
        if position.in_check(turn.other()) {
            return Err(Error::KingCapturable(turn.other(), turn));
        }
        position.evaluate_turn();
        Ok(position)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn turn(&self) -> Color {
        self.state.turn
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.state.en_passant_target
    }

    /// Whether the side to move is in check
    pub fn is_check(&self) -> bool {
        self.state.check
    }

    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn promotion_pending(&self) -> Option<Square> {
        self.state.promotion_pending
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.state.outcome
    }

    /// The moves of the piece on `from` before king safety is considered
    pub fn candidate_moves(&self, from: Square) -> Vec<Square> {
        self.board
            .get(from)
            .map(|piece| piece.candidate_moves(&self.board, self.state.en_passant_target))
            .unwrap_or_default()
    }

    /// The squares the piece on `from` may legally move to
    ///
    /// This looks only at the piece, not at whose turn it is.
    pub fn legal_moves(&mut self, from: Square) -> Vec<Square> {
        legality::legal_moves(&mut self.board, from, self.state.en_passant_target)
    }

    /// Every move the side to move may make
    ///
    /// Empty once the game is over, and while a promotion is pending.
    pub fn all_legal_moves(&mut self) -> Vec<(Square, Square)> {
        if self.state.game_over || self.state.promotion_pending.is_some() {
            return Vec::new();
        }
        legality::all_legal_moves(&mut self.board, self.state.turn, self.state.en_passant_target)
    }

    pub fn in_check(&self, color: Color) -> bool {
        let king = self
            .board
            .king_square(color)
            .expect_invariant("each side has a king on the board");
        attack::is_attacked(&self.board, king, color.other())
    }

    pub fn has_legal_moves(&mut self, color: Color) -> bool {
        legality::has_legal_moves(&mut self.board, color, self.state.en_passant_target)
    }

    /// In check with no legal move
    pub fn is_checkmate(&mut self, color: Color) -> bool {
        self.in_check(color) && !self.has_legal_moves(color)
    }

    /// Not in check, but with no legal move either
    pub fn is_stalemate(&mut self, color: Color) -> bool {
        !self.in_check(color) && !self.has_legal_moves(color)
    }

    pub fn can_castle_short(&self, color: Color) -> bool {
        castling::can_castle_short(&self.board, color)
    }

    pub fn can_castle_long(&self, color: Color) -> bool {
        castling::can_castle_long(&self.board, color)
    }

    /// Check that the side to move may move the piece on `from` to `to`
    pub fn validate_move(&mut self, from: Square, to: Square) -> Result<(), Rejection> {
        if self.state.game_over {
            return Err(Rejection::GameOver);
        }
        if self.state.promotion_pending.is_some() {
            return Err(Rejection::PromotionPending);
        }
        let piece = self.board.get(from).ok_or(Rejection::NoPiece(from))?;
        if piece.color != self.state.turn {
            return Err(Rejection::NotYourTurn(from));
        }
        if !self.legal_moves(from).contains(&to) {
            return Err(Rejection::IllegalDestination { from, to });
        }
        Ok(())
    }

    /// Move the piece on `from` to `to`, if that's legal for the side to move
    ///
    /// Castling is requested by moving the king two squares, and en passant by moving the pawn
    /// onto the skipped square. A pawn reaching the last row leaves the promotion pending until
    /// [`Position::resolve_promotion`] is called.
    pub fn apply_move(&mut self, from: Square, to: Square) -> MoveOutcome {
        if let Err(rejection) = self.validate_move(from, to) {
            debug!(%from, %to, %rejection, "move rejected");
            return MoveOutcome::Rejected(rejection);
        }

        let en_passant_target = self.state.en_passant_target.take();
        let (kind, color) = {
            let mover = self
                .board
                .get(from)
                .expect_invariant("validated move starts from an occupied square");
            (mover.kind, mover.color)
        };

        if kind == PieceKind::King {
            if let Some(side) = CastleSide::from_king_move(color, from, to) {
                let rook = side.rook_destination(color);
                self.board.relocate(side.rook_origin(color), rook);
                self.mark_moved(rook);
                debug!(%color, ?side, "castling");
            }
        }

        if let Some(victim) =
            movement::en_passant_victim(&self.board, from, to, en_passant_target)
        {
            self.board.take(victim);
            debug!(%from, %to, %victim, "en passant capture");
        }
        let captured = self.board.relocate(from, to);
        self.mark_moved(to);
        debug!(%color, ?kind, %from, %to, captured = ?captured.map(|piece| piece.kind), "move applied");

        if kind == PieceKind::Pawn && from.row().abs_diff(to.row()) == 2 {
            self.state.en_passant_target =
                Some(Square::from_row_col((from.row() + to.row()) / 2, from.col()));
        }

        if kind == PieceKind::Pawn && to.row() == color.promotion_row() {
            self.state.promotion_pending = Some(to);
            debug!(square = %to, "promotion pending");
            return MoveOutcome::PromotionPending { square: to };
        }

        self.finish_turn()
    }

    /// Replace the pawn awaiting promotion with a piece of the given kind, then pass the turn
    ///
    /// Fails without changing anything if no promotion is pending or `kind` isn't something a
    /// pawn can become.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> Result<MoveOutcome> {
        let Some(square) = self.state.promotion_pending else {
            return Err(Error::NoPromotionPending);
        };
        if !kind.is_promotable() {
            return Err(Error::InvalidPromotion(kind));
        }
        let pawn = self
            .board
            .take(square)
            .expect_invariant("pending promotion square holds the pawn");
        invariant!(
            pawn.kind == PieceKind::Pawn,
            "pending promotion on {square} holds a {:?}",
            pawn.kind
        );
        let mut promoted = Piece::new(kind, pawn.color);
        promoted.moved = true;
        self.board.put(square, promoted);
        self.state.promotion_pending = None;
        info!(color = %pawn.color, ?kind, %square, "pawn promoted");
        Ok(self.finish_turn())
    }

    fn mark_moved(&mut self, square: Square) {
        if let Some(piece) = self.board.get_mut(square) {
            piece.moved = true;
        }
    }

    /// Pass the turn and find out what the new side to move is facing
    fn finish_turn(&mut self) -> MoveOutcome {
        self.state.turn = self.state.turn.other();
        self.evaluate_turn()
    }

    fn evaluate_turn(&mut self) -> MoveOutcome {
        let turn = self.state.turn;
        self.state.check = self.in_check(turn);
        if self.has_legal_moves(turn) {
            if self.state.check {
                let king = self
                    .board
                    .king_square(turn)
                    .expect_invariant("each side has a king on the board");
                let checkers = attack::attackers(&self.board, king, turn.other());
                debug!(%turn, ?checkers, "check");
            }
            return MoveOutcome::Applied {
                check: self.state.check,
            };
        }

        let outcome = if self.state.check {
            GameOutcome::Checkmate {
                winner: turn.other(),
            }
        } else {
            GameOutcome::Stalemate
        };
        self.state.game_over = true;
        self.state.outcome = Some(outcome);
        info!(%outcome, "game over");
        match outcome {
            GameOutcome::Checkmate { winner } => MoveOutcome::Checkmate {
                winner,
                loser: winner.other(),
            },
            GameOutcome::Stalemate => MoveOutcome::Stalemate,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}
