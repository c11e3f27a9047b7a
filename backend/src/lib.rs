use players::Player;
use rules::{
    Color, EngineConfig, GameOutcome, MoveOutcome, PieceKind, Rejection, ResultReporter, RuleEngine,
};
use tracing::{info, warn};
use utils::InvariantExpect;

/// What happened when a player was asked for a move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalfMove {
    /// The move was made, along with any promotion it called for
    Played(MoveOutcome),
    /// The player asked for a move the rules don't allow, and nothing changed
    Rejected(Rejection),
    /// The player stopped playing
    Quit,
}

/// A backend which queries moves from the two players until the game is done
pub struct Backend<White, Black, R> {
    /// The game being played
    engine: RuleEngine<R>,
    /// The white player
    white_player: White,
    /// The black player
    black_player: Black,
    /// Stop after this many half-moves, if set
    max_plies: Option<usize>,
    /// Half-moves played so far
    plies: usize,
}

impl<White: Player, Black: Player, R: ResultReporter> Backend<White, Black, R> {
    /// Create a new instance with the chess starting board
    pub fn new(white_player: White, black_player: Black, config: EngineConfig, reporter: R) -> Self {
        Self {
            engine: RuleEngine::new(config, reporter),
            white_player,
            black_player,
            max_plies: None,
            plies: 0,
        }
    }

    /// Give up on the game, without a result, after this many half-moves
    pub fn with_max_plies(mut self, max_plies: Option<usize>) -> Self {
        self.max_plies = max_plies;
        self
    }

    /// Query whoever's turn it is to make a move
    ///
    /// The move is applied and, if it promotes a pawn, the same player picks the new piece. The
    /// other player is then told about the move.
    pub fn play_half_move(&mut self) -> HalfMove {
        let turn = self.engine.position().turn();
        let legal_moves = self.engine.all_legal_moves();
        let position = self.engine.position();
        let choice = match turn {
            Color::White => self.white_player.choose_move(position, &legal_moves),
            Color::Black => self.black_player.choose_move(position, &legal_moves),
        };
        let Some((from, to)) = choice else {
            info!(%turn, "player quit");
            return HalfMove::Quit;
        };

        let mut outcome = self.engine.apply_move(from, to);
        if let MoveOutcome::Rejected(rejection) = outcome {
            warn!(%turn, %from, %to, %rejection, "player chose an illegal move");
            return HalfMove::Rejected(rejection);
        }
        if let MoveOutcome::PromotionPending { square } = outcome {
            let position = self.engine.position();
            let mut kind = match turn {
                Color::White => self.white_player.choose_promotion(position, square),
                Color::Black => self.black_player.choose_promotion(position, square),
            };
            if !kind.is_promotable() {
                warn!(%turn, ?kind, "player chose an invalid promotion, promoting to a queen");
                kind = PieceKind::Queen;
            }
            outcome = self
                .engine
                .resolve_promotion(kind)
                .expect_invariant("a promotable kind resolves the pending promotion");
        }
        self.plies += 1;

        let position = self.engine.position();
        match turn {
            Color::White => self.black_player.react_to_move(position, (from, to), outcome),
            Color::Black => self.white_player.react_to_move(position, (from, to), outcome),
        }
        HalfMove::Played(outcome)
    }

    /// Play the game until it ends, a player quits, or the ply limit is reached
    ///
    /// Returns how the game ended, if it did.
    pub fn play_game(&mut self) -> Option<GameOutcome> {
        loop {
            if let Some(outcome) = self.engine.position().outcome() {
                let position = self.engine.position();
                self.white_player.react_to_outcome(position, outcome);
                self.black_player.react_to_outcome(position, outcome);
                return Some(outcome);
            }
            if self.max_plies.is_some_and(|max| self.plies >= max) {
                info!(plies = self.plies, "ply limit reached");
                return None;
            }
            if self.play_half_move() == HalfMove::Quit {
                return None;
            }
        }
    }

    /// The number of half-moves played so far
    pub fn plies(&self) -> usize {
        self.plies
    }

    /// Get the game being played
    pub fn engine(&self) -> &RuleEngine<R> {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use monke::MonkePlayer;
    use rules::{Position, Square};
    use std::collections::VecDeque;

    /// Plays the given moves in order, then quits
    struct ScriptedPlayer {
        moves: VecDeque<(Square, Square)>,
        seen: Vec<(Square, Square)>,
        outcome: Option<GameOutcome>,
        promotion: PieceKind,
    }

    impl ScriptedPlayer {
        fn new(moves: &[(Square, Square)]) -> Self {
            Self {
                moves: moves.iter().copied().collect(),
                seen: Vec::new(),
                outcome: None,
                promotion: PieceKind::Queen,
            }
        }
    }

    impl Player for ScriptedPlayer {
        fn choose_move(
            &mut self,
            _position: &Position,
            _legal_moves: &[(Square, Square)],
        ) -> Option<(Square, Square)> {
            self.moves.pop_front()
        }

        fn choose_promotion(&mut self, _position: &Position, _square: Square) -> PieceKind {
            self.promotion
        }

        fn react_to_move(&mut self, _position: &Position, mv: (Square, Square), _: MoveOutcome) {
            self.seen.push(mv);
        }

        fn react_to_outcome(&mut self, _position: &Position, outcome: GameOutcome) {
            self.outcome = Some(outcome);
        }
    }

    #[test]
    fn test_fools_mate() {
        let white = ScriptedPlayer::new(&[(Square::F2, Square::F3), (Square::G2, Square::G4)]);
        let black = ScriptedPlayer::new(&[(Square::E7, Square::E5), (Square::D8, Square::H4)]);
        let mut backend = Backend::new(white, black, EngineConfig::default(), Vec::new());
        let black_wins = GameOutcome::Checkmate {
            winner: Color::Black,
        };
        assert_eq!(backend.play_game(), Some(black_wins));
        assert_eq!(backend.plies(), 4);
        assert_eq!(backend.engine().reporter(), &vec![black_wins]);
        assert_eq!(
            backend.white_player.seen,
            vec![(Square::E7, Square::E5), (Square::D8, Square::H4)]
        );
        assert_eq!(backend.white_player.outcome, Some(black_wins));
        assert_eq!(backend.black_player.outcome, Some(black_wins));
    }

    #[test]
    fn test_rejected_move_is_asked_again() {
        let white = ScriptedPlayer::new(&[(Square::E2, Square::E5), (Square::E2, Square::E4)]);
        let black = ScriptedPlayer::new(&[]);
        let mut backend = Backend::new(white, black, EngineConfig::default(), ());
        assert_eq!(
            backend.play_half_move(),
            HalfMove::Rejected(Rejection::IllegalDestination {
                from: Square::E2,
                to: Square::E5
            })
        );
        assert_eq!(
            backend.play_half_move(),
            HalfMove::Played(MoveOutcome::Applied { check: false })
        );
        // Black has no moves scripted, so quits
        assert_eq!(backend.play_game(), None);
        assert_eq!(backend.plies(), 1);
    }

    #[test]
    fn test_random_games_terminate() {
        for seed in 0..4 {
            let mut backend = Backend::new(
                MonkePlayer::with_seed(seed),
                MonkePlayer::with_seed(seed + 100),
                EngineConfig::default(),
                Vec::new(),
            )
            .with_max_plies(Some(300));
            let outcome = backend.play_game();
            assert!(backend.plies() <= 300);
            match outcome {
                Some(outcome) => assert_eq!(backend.engine().reporter(), &vec![outcome]),
                None => assert!(backend.engine().reporter().is_empty()),
            }
        }
    }

    #[test]
    fn test_invalid_promotion_becomes_queen() {
        let position = Position::from_placement("8/4P3/8/8/8/8/8/k3K3", Color::White).unwrap();
        let mut white = ScriptedPlayer::new(&[(Square::E7, Square::E8)]);
        white.promotion = PieceKind::King;
        let black = ScriptedPlayer::new(&[]);
        let mut backend = Backend::new(white, black, EngineConfig::default(), ());
        backend.engine = RuleEngine::with_position(position, EngineConfig::default(), ());
        assert_eq!(
            backend.play_half_move(),
            HalfMove::Played(MoveOutcome::Applied { check: false })
        );
        let promoted = backend.engine().position().board().get(Square::E8).unwrap();
        assert_eq!(promoted.kind, PieceKind::Queen);
        assert_eq!(backend.engine().position().turn(), Color::Black);
    }
}
