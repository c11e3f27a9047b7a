//! Traits for an arbitrary player

use rules::{GameOutcome, MoveOutcome, PieceKind, Position, Square};

/// A player in a game
///
/// This trait is generic over how the players decides what to do, so terminal and computer players
/// can both implement this.
pub trait Player {
    /// Decide on a move to make, as `(from, to)`
    ///
    /// `legal_moves` holds every move the side to move may make, and the answer should be one of
    /// them. Returning `None` resigns from playing, ending the game without a result.
    fn choose_move(
        &mut self,
        position: &Position,
        legal_moves: &[(Square, Square)],
    ) -> Option<(Square, Square)>;

    /// Pick what the pawn which just reached the last row on `square` becomes
    fn choose_promotion(&mut self, position: &Position, square: Square) -> PieceKind;

    /// React to the opponent making the given move
    fn react_to_move(
        &mut self,
        _position: &Position,
        _opponent_move: (Square, Square),
        _outcome: MoveOutcome,
    ) {
    }

    /// React to the end of the game
    fn react_to_outcome(&mut self, _position: &Position, _outcome: GameOutcome) {}
}
