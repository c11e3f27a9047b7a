use std::{error::Error, path::PathBuf};

use backend::Backend;
use clap::{Parser, Subcommand, ValueEnum};
use games_database::{GameHistory, JsonLinesStore, ResultStore};
use monke::MonkePlayer;
use players::Player;
use rules::{EngineConfig, GameOutcome, MoveOutcome, PieceKind, Position, Square};
use terminal_ui::TerminalUIPlayer;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Play chess in the terminal")]
struct Cli {
    /// Where finished games are recorded
    #[arg(long, global = true, default_value = "game_history.jsonl")]
    history: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play a game (the default)
    Play(PlayArgs),
    /// List the results of past games
    History,
}

#[derive(Debug, clap::Args)]
struct PlayArgs {
    /// Who plays white
    #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
    white: PlayerKind,
    /// Who plays black
    #[arg(long, value_enum, default_value_t = PlayerKind::Random)]
    black: PlayerKind,
    /// Promote pawns to queens without asking
    #[arg(long)]
    auto_promote: bool,
    /// Seed for the random players, so games can be replayed
    #[arg(long)]
    seed: Option<u64>,
    /// Stop the game without a result after this many half-moves
    #[arg(long)]
    max_plies: Option<usize>,
}

/// A human at the keyboard against a random opponent
impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            white: PlayerKind::Human,
            black: PlayerKind::Random,
            auto_promote: false,
            seed: None,
            max_plies: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    Human,
    Random,
}

/// Either kind of player, picked at runtime
enum AnyPlayer {
    Human(TerminalUIPlayer),
    Random(MonkePlayer),
}

impl AnyPlayer {
    fn new(kind: PlayerKind, seed: Option<u64>) -> Self {
        match (kind, seed) {
            (PlayerKind::Human, _) => Self::Human(TerminalUIPlayer::new()),
            (PlayerKind::Random, Some(seed)) => Self::Random(MonkePlayer::with_seed(seed)),
            (PlayerKind::Random, None) => Self::Random(MonkePlayer::new()),
        }
    }

    fn player(&mut self) -> &mut dyn Player {
        match self {
            Self::Human(player) => player,
            Self::Random(player) => player,
        }
    }
}

impl Player for AnyPlayer {
    fn choose_move(
        &mut self,
        position: &Position,
        legal_moves: &[(Square, Square)],
    ) -> Option<(Square, Square)> {
        self.player().choose_move(position, legal_moves)
    }

    fn choose_promotion(&mut self, position: &Position, square: Square) -> PieceKind {
        self.player().choose_promotion(position, square)
    }

    fn react_to_move(&mut self, position: &Position, mv: (Square, Square), outcome: MoveOutcome) {
        self.player().react_to_move(position, mv, outcome);
    }

    fn react_to_outcome(&mut self, position: &Position, outcome: GameOutcome) {
        self.player().react_to_outcome(position, outcome);
    }
}

fn play(args: PlayArgs, history: PathBuf) {
    let config = EngineConfig {
        auto_promote: args.auto_promote,
    };
    // The two random players mustn't mirror each other when seeded
    let white = AnyPlayer::new(args.white, args.seed);
    let black = AnyPlayer::new(args.black, args.seed.map(|seed| seed.wrapping_add(1)));
    let reporter = GameHistory::new(JsonLinesStore::new(history));
    let mut backend = Backend::new(white, black, config, reporter).with_max_plies(args.max_plies);
    match backend.play_game() {
        Some(outcome) => println!("{outcome}"),
        None => println!("Game stopped after {} half-moves", backend.plies()),
    }
}

fn list_history(history: PathBuf) -> Result<(), games_database::Error> {
    let records = JsonLinesStore::new(history).records()?;
    if records.is_empty() {
        println!("No games played yet");
    }
    for record in records {
        println!("{record}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or_else(|| Command::Play(PlayArgs::default())) {
        Command::Play(args) => play(args, cli.history),
        Command::History => list_history(cli.history)?,
    }
    Ok(())
}
