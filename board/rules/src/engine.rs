use board::{GameOutcome, PieceKind, Square};
use tracing::{info, trace};
use utils::InvariantExpect;

use crate::{MoveOutcome, Position, Result};

/// Something which wants to hear about every finished game
pub trait ResultReporter {
    /// Called exactly once for each game, when it ends
    fn report(&mut self, outcome: GameOutcome);
}

/// Forgets every result
impl ResultReporter for () {
    fn report(&mut self, _outcome: GameOutcome) {}
}

impl ResultReporter for Vec<GameOutcome> {
    fn report(&mut self, outcome: GameOutcome) {
        self.push(outcome);
    }
}

impl<R: ResultReporter + ?Sized> ResultReporter for &mut R {
    fn report(&mut self, outcome: GameOutcome) {
        (**self).report(outcome);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Promote pawns to queens without waiting for a choice
    pub auto_promote: bool,
}

/// What a call to [`RuleEngine::select`] did to the selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// The piece on this square is now selected
    Selected(Square),
    Cleared,
    Unchanged,
}

/// What a call to [`RuleEngine::click`] did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Click {
    Selection(Selection),
    Move(MoveOutcome),
}

/// A game in progress, along with the piece selection of whoever is playing it interactively
pub struct RuleEngine<R> {
    position: Position,
    config: EngineConfig,
    selected: Option<Square>,
    highlighted: Vec<Square>,
    reporter: R,
}

impl<R: ResultReporter> RuleEngine<R> {
    /// Start a new game from the standard position
    pub fn new(config: EngineConfig, reporter: R) -> Self {
        Self::with_position(Position::new(), config, reporter)
    }

    pub fn with_position(position: Position, config: EngineConfig, reporter: R) -> Self {
        Self {
            position,
            config,
            selected: None,
            highlighted: Vec::new(),
            reporter,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// The legal destinations of the selected piece
    pub fn highlighted(&self) -> &[Square] {
        &self.highlighted
    }

    pub fn legal_moves(&mut self, square: Square) -> Vec<Square> {
        self.position.legal_moves(square)
    }

    pub fn all_legal_moves(&mut self) -> Vec<(Square, Square)> {
        self.position.all_legal_moves()
    }

    /// Select the piece on `square`, or deselect it if it is already selected
    ///
    /// Only a piece of the side to move which has somewhere to go can be selected. Picking
    /// anything else leaves the selection alone, except for an own piece with no moves, which
    /// clears it.
    pub fn select(&mut self, square: Square) -> Selection {
        if self.position.is_game_over() || self.position.promotion_pending().is_some() {
            return Selection::Unchanged;
        }
        if self.selected == Some(square) {
            self.clear_selection();
            return Selection::Cleared;
        }
        if self.position.board().color_at(square) != Some(self.position.turn()) {
            return Selection::Unchanged;
        }
        let moves = self.position.legal_moves(square);
        if moves.is_empty() {
            if self.selected.is_some() {
                self.clear_selection();
                return Selection::Cleared;
            }
            return Selection::Unchanged;
        }
        trace!(%square, moves = moves.len(), "piece selected");
        self.selected = Some(square);
        self.highlighted = moves;
        Selection::Selected(square)
    }

    /// React to the player picking `square` on the board
    ///
    /// With a piece selected, picking anything but another piece of the side to move is an
    /// attempt to move there. A rejected attempt keeps the selection.
    pub fn click(&mut self, square: Square) -> Click {
        match self.selected {
            Some(from)
                if from != square
                    && self.position.board().color_at(square) != Some(self.position.turn()) =>
            {
                Click::Move(self.apply_move(from, square))
            }
            _ => Click::Selection(self.select(square)),
        }
    }

    /// Apply a move, reporting the result if it ends the game
    ///
    /// Clears the selection unless the move is rejected. With
    /// [`EngineConfig::auto_promote`] set, a pawn reaching the last row becomes a queen at once.
    pub fn apply_move(&mut self, from: Square, to: Square) -> MoveOutcome {
        let outcome = self.position.apply_move(from, to);
        if outcome.is_rejected() {
            return outcome;
        }
        self.clear_selection();
        let outcome = match outcome {
            MoveOutcome::PromotionPending { .. } if self.config.auto_promote => self
                .position
                .resolve_promotion(PieceKind::Queen)
                .expect_invariant("a queen resolves the promotion just made"),
            outcome => outcome,
        };
        self.report(outcome)
    }

    pub fn resolve_promotion(&mut self, kind: PieceKind) -> Result<MoveOutcome> {
        let outcome = self.position.resolve_promotion(kind)?;
        Ok(self.report(outcome))
    }

    /// Throw away the current game and start again from the standard position
    pub fn restart(&mut self) {
        self.position = Position::new();
        self.clear_selection();
        info!("new game started");
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.highlighted.clear();
    }

    fn report(&mut self, outcome: MoveOutcome) -> MoveOutcome {
        if let Some(game) = outcome.game_outcome() {
            self.reporter.report(game);
        }
        outcome
    }
}
