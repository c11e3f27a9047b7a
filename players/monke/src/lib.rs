//! A player which makes purely random moves

use rules::{PieceKind, Position, Square};

use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

/// A player which makes purely random moves
///
/// The name is pronounced like "Monkey"
#[derive(Debug)]
pub struct MonkePlayer {
    /// How we decide what to do
    rng: SmallRng,
}

impl MonkePlayer {
    /// Create a new player seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a player which makes the same choices every time it sees the same game
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl players::Player for MonkePlayer {
    fn choose_move(
        &mut self,
        _position: &Position,
        legal_moves: &[(Square, Square)],
    ) -> Option<(Square, Square)> {
        legal_moves.choose(&mut self.rng).copied()
    }

    fn choose_promotion(&mut self, _position: &Position, _square: Square) -> PieceKind {
        *PieceKind::PROMOTIONS
            .choose(&mut self.rng)
            .unwrap_or(&PieceKind::Queen)
    }
}

impl Default for MonkePlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use players::Player;

    #[test]
    fn test_picks_a_legal_move() {
        let mut position = Position::new();
        let moves = position.all_legal_moves();
        let mut monke = MonkePlayer::with_seed(7);
        for _ in 0..50 {
            let choice = monke.choose_move(&position, &moves).unwrap();
            assert!(moves.contains(&choice));
        }
    }

    #[test]
    fn test_same_seed_same_choices() {
        let mut position = Position::new();
        let moves = position.all_legal_moves();
        let mut first = MonkePlayer::with_seed(42);
        let mut second = MonkePlayer::with_seed(42);
        for _ in 0..20 {
            assert_eq!(
                first.choose_move(&position, &moves),
                second.choose_move(&position, &moves)
            );
            assert_eq!(
                first.choose_promotion(&position, Square::A8),
                second.choose_promotion(&position, Square::A8)
            );
        }
    }

    #[test]
    fn test_no_moves_means_no_choice() {
        let position = Position::new();
        assert_eq!(MonkePlayer::new().choose_move(&position, &[]), None);
        assert!(MonkePlayer::new()
            .choose_promotion(&position, Square::A8)
            .is_promotable());
    }
}
