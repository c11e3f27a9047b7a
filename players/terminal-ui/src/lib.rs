//! A player typing moves into the terminal

use std::io::{self, BufRead, Write};

use rules::{GameOutcome, MoveOutcome, PieceKind, Position, Square};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("expected two squares, like `e2 e4` or `6,4 4,4`")]
    WrongWordCount,
    #[error(transparent)]
    BadSquare(#[from] board::SquareParseError),
}

/// Parse a move typed as two squares, either by name (`e2 e4`) or as `row,col` (`6,4 4,4`)
pub fn parse_move(line: &str) -> Result<(Square, Square), InputError> {
    let mut words = line.split_whitespace();
    let (Some(from), Some(to), None) = (words.next(), words.next(), words.next()) else {
        return Err(InputError::WrongWordCount);
    };
    Ok((from.parse::<Square>()?, to.parse::<Square>()?))
}

/// Somewhere to read typed lines from
pub trait LineSource {
    /// Append the next line to `buf`, returning the number of bytes read, or 0 at the end
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

/// Locks stdin only for the duration of each line, so two players can share the terminal
impl LineSource for io::Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::Stdin::read_line(self, buf)
    }
}

impl LineSource for &[u8] {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// An input for a human typing in the terminal
pub struct TerminalUIPlayer<R = io::Stdin, W = io::Stdout> {
    input: R,
    output: W,
}

impl TerminalUIPlayer {
    /// A player reading from stdin and writing to stdout
    pub fn new() -> Self {
        Self::with_io(io::stdin(), io::stdout())
    }
}

impl Default for TerminalUIPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: LineSource, W: Write> TerminalUIPlayer<R, W> {
    pub fn with_io(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompt and read one line, or `None` once input has ended
    fn prompt(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{prompt}");
        let _ = self.output.flush();
        let mut buffer = String::new();
        match self.input.read_line(&mut buffer) {
            Ok(0) => None,
            Ok(_) => Some(buffer.trim().to_string()),
            Err(e) => {
                warn!(error = %e, "failed to read from the terminal");
                None
            }
        }
    }

    fn show(&mut self, position: &Position) {
        let _ = writeln!(self.output, "\n{}\n", position.board());
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: LineSource, W: Write> players::Player for TerminalUIPlayer<R, W> {
    fn choose_move(
        &mut self,
        position: &Position,
        legal_moves: &[(Square, Square)],
    ) -> Option<(Square, Square)> {
        self.show(position);
        if position.is_check() {
            let _ = writeln!(self.output, "Check!");
        }
        let prompt = format!("Move for {} (e.g. `e2 e4`, or `quit`): ", position.turn());
        loop {
            let line = self.prompt(&prompt)?;
            if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
                return None;
            }
            match parse_move(&line) {
                Ok(mv) if legal_moves.contains(&mv) => return Some(mv),
                Ok((from, to)) => {
                    let _ = writeln!(self.output, "{from} to {to} is not a legal move");
                }
                Err(e) => {
                    let _ = writeln!(self.output, "{e}");
                }
            }
        }
    }

    fn choose_promotion(&mut self, position: &Position, square: Square) -> PieceKind {
        self.show(position);
        loop {
            let prompt = format!("Promote the pawn on {square} to (Q/R/B/N): ");
            let Some(line) = self.prompt(&prompt) else {
                return PieceKind::Queen;
            };
            if let Some(kind) = line.chars().next().and_then(PieceKind::from_promotion_key) {
                return kind;
            }
            let _ = writeln!(self.output, "Please press Q, R, B, or N");
        }
    }

    fn react_to_move(
        &mut self,
        _position: &Position,
        (from, to): (Square, Square),
        outcome: MoveOutcome,
    ) {
        let _ = writeln!(self.output, "Opponent moved {from} to {to}");
        if let MoveOutcome::Applied { check: true } = outcome {
            let _ = writeln!(self.output, "You are in check");
        }
    }

    fn react_to_outcome(&mut self, position: &Position, outcome: GameOutcome) {
        self.show(position);
        let _ = writeln!(self.output, "{outcome}");
    }
}
