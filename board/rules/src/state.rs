use board::{Color, GameOutcome, Square};

/// Everything about a game in progress besides where the pieces stand
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Whose move it is
    pub turn: Color,
    /// The square a pawn skipped over on the previous move, if it advanced two squares
    ///
    /// Only the very next move may capture onto it.
    pub en_passant_target: Option<Square>,
    /// Whether the side to move is in check
    pub check: bool,
    pub game_over: bool,
    /// The square of a pawn which reached the last row and awaits its new kind
    ///
    /// While this is set the turn doesn't pass and no other move is accepted.
    pub promotion_pending: Option<Square>,
    /// How the game ended, once `game_over` is set
    pub outcome: Option<GameOutcome>,
}

impl GameState {
    /// The state at the start of a game, with white to move
    pub const fn new() -> Self {
        Self::with_turn(Color::White)
    }

    pub const fn with_turn(turn: Color) -> Self {
        Self {
            turn,
            en_passant_target: None,
            check: false,
            game_over: false,
            promotion_pending: None,
            outcome: None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
