//! The rules of chess, played out on a [`board::Board`]
//!
//! [`Position`] pairs a board with the [`GameState`] and is the only way moves get applied.
//! [`RuleEngine`] wraps a position with the piece selection an interactive front end needs, and
//! reports finished games to a [`ResultReporter`].

pub mod attack;
pub mod castling;
mod engine;
pub mod legality;
pub mod movement;
mod position;
mod state;

pub use board::{Board, Color, GameOutcome, Piece, PieceKind, Square};
pub use engine::{Click, EngineConfig, ResultReporter, RuleEngine, Selection};
pub use movement::Movement;
pub use position::{MoveOutcome, Position};
pub use state::GameState;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no pawn is waiting to be promoted")]
    NoPromotionPending,
    #[error("a pawn can't be promoted to a {0:?}")]
    InvalidPromotion(PieceKind),
    #[error("starting position is invalid: {0}")]
    Placement(#[from] board::PlacementError),
    #[error("starting position has no {0} king")]
    MissingKing(Color),
    #[error("starting position has more than one {0} king")]
    ExtraKing(Color),
    #[error("starting position leaves the {0} king in check with {1} to move")]
    KingCapturable(Color, Color),
}

/// Why a requested move wasn't applied
///
/// A rejected move never changes the board or the game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("there is no piece on {0}")]
    NoPiece(Square),
    #[error("the piece on {0} doesn't belong to the side to move")]
    NotYourTurn(Square),
    #[error("the piece on {from} can't move to {to}")]
    IllegalDestination { from: Square, to: Square },
    #[error("a pawn must be promoted first")]
    PromotionPending,
    #[error("the game is over")]
    GameOver,
}

#[cfg(test)]
mod properties;
