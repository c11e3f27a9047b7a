//! A record of every finished game
//!
//! Each game gets the next free id (one more than the largest stored, starting at 1) and the
//! local time it ended. Records are stored one JSON object per line, so writing a game only ever
//! appends to the file.

use core::fmt;
use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use board::{Color, GameOutcome};
use chrono::{DateTime, Local};
use rules::ResultReporter;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access the game history: {0}")]
    Io(#[from] io::Error),
    #[error("line {line} of the game history is malformed: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode a game record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// One finished game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: u64,
    /// `None` for a stalemate
    pub winner: Option<Color>,
    /// `None` for a stalemate
    pub loser: Option<Color>,
    pub timestamp: DateTime<Local>,
}

impl GameRecord {
    pub fn new(id: u64, outcome: GameOutcome, timestamp: DateTime<Local>) -> Self {
        Self {
            id,
            winner: outcome.winner(),
            loser: outcome.loser(),
            timestamp,
        }
    }

    pub fn outcome(&self) -> GameOutcome {
        match self.winner {
            Some(winner) => GameOutcome::Checkmate { winner },
            None => GameOutcome::Stalemate,
        }
    }
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f");
        match (self.winner, self.loser) {
            (Some(winner), Some(loser)) => {
                write!(f, "Winner: {winner}, Loser: {loser}, Time: {time}")
            }
            _ => write!(f, "Stalemate, Time: {time}"),
        }
    }
}

/// Somewhere game records are kept
pub trait ResultStore {
    /// Every stored record, oldest first
    fn records(&self) -> Result<Vec<GameRecord>>;

    fn insert(&mut self, record: &GameRecord) -> Result<()>;

    /// The id the next game should get
    fn next_id(&self) -> Result<u64> {
        let records = self.records()?;
        Ok(records.iter().map(|record| record.id).max().map_or(1, |id| id + 1))
    }
}

/// Records kept in a file, one JSON object per line
#[derive(Clone, Debug)]
pub struct JsonLinesStore {
    path: PathBuf,
}

impl JsonLinesStore {
    /// Use the file at `path`, which is created when the first game is stored
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultStore for JsonLinesStore {
    fn records(&self) -> Result<Vec<GameRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| Error::Json {
                    line: idx + 1,
                    source,
                })
            })
            .collect()
    }

    fn insert(&mut self, record: &GameRecord) -> Result<()> {
        let mut line = serde_json::to_string(record).map_err(Error::Encode)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        debug!(path = %self.path.display(), id = record.id, "game record appended");
        Ok(())
    }
}

/// Records kept only as long as the process runs
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Vec<GameRecord>,
}

impl MemoryStore {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl ResultStore for MemoryStore {
    fn records(&self) -> Result<Vec<GameRecord>> {
        Ok(self.records.clone())
    }

    fn insert(&mut self, record: &GameRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Stamps finished games with an id and the time, and keeps them in a [`ResultStore`]
#[derive(Debug)]
pub struct GameHistory<S> {
    store: S,
}

impl<S: ResultStore> GameHistory<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Store the result of a game which just ended
    pub fn record(&mut self, outcome: GameOutcome) -> Result<GameRecord> {
        let record = GameRecord::new(self.store.next_id()?, outcome, Local::now());
        self.store.insert(&record)?;
        info!(id = record.id, %outcome, "game result saved");
        Ok(record)
    }

    /// Every game recorded so far, oldest first
    pub fn records(&self) -> Result<Vec<GameRecord>> {
        self.store.records()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Failing to save a result mustn't end the program, so errors are only logged
impl<S: ResultStore> ResultReporter for GameHistory<S> {
    fn report(&mut self, outcome: GameOutcome) {
        if let Err(e) = self.record(outcome) {
            error!(error = %e, %outcome, "failed to save game result");
        }
    }
}
