//! Offline score tally and its file-backed store.

use derive_getters::Getters;
use derive_more::{Display, Error};
use noughts_rules::Outcome;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Wins and ties across offline games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBoard {
    #[serde(default)]
    human_wins: u32,
    #[serde(default)]
    computer_wins: u32,
    #[serde(default)]
    ties: u32,
}

impl ScoreBoard {
    /// Counts one finished game. In-progress outcomes are ignored.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::HumanWin => self.human_wins += 1,
            Outcome::ComputerWin => self.computer_wins += 1,
            Outcome::Tie => self.ties += 1,
            Outcome::InProgress => {}
        }
    }

    /// Games counted so far.
    pub fn total(&self) -> u32 {
        self.human_wins + self.computer_wins + self.ties
    }
}

impl std::fmt::Display for ScoreBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Human: {}  Computer: {}  Ties: {}",
            self.human_wins, self.computer_wins, self.ties
        )
    }
}

/// Persistence error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Persistence error: {} at {}:{}", message, file, line)]
pub struct PersistError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl PersistError {
    /// Creates a new persistence error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Score tally kept in a small TOML file.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    /// Creates a store at the given path. Nothing is read until [`ScoreStore::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the tally lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the tally. A missing file is an empty tally.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the file exists but cannot be read or parsed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<ScoreBoard, PersistError> {
        if !self.path.exists() {
            debug!("No score file, starting from zero");
            return Ok(ScoreBoard::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| PersistError::new(format!("Failed to read scores: {}", e)))?;
        let scores: ScoreBoard = toml::from_str(&content)
            .map_err(|e| PersistError::new(format!("Failed to parse scores: {}", e)))?;
        info!(%scores, "Scores loaded");
        Ok(scores)
    }

    /// Writes the tally, replacing the file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the file cannot be written.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn save(&self, scores: &ScoreBoard) -> Result<(), PersistError> {
        let content = toml::to_string(scores)
            .map_err(|e| PersistError::new(format!("Failed to encode scores: {}", e)))?;
        std::fs::write(&self.path, content)
            .map_err(|e| PersistError::new(format!("Failed to write scores: {}", e)))?;
        info!(%scores, "Scores saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_each_result() {
        let mut scores = ScoreBoard::default();
        scores.record(Outcome::HumanWin);
        scores.record(Outcome::ComputerWin);
        scores.record(Outcome::Tie);
        scores.record(Outcome::Tie);
        scores.record(Outcome::InProgress);
        assert_eq!(*scores.human_wins(), 1);
        assert_eq!(*scores.computer_wins(), 1);
        assert_eq!(*scores.ties(), 2);
        assert_eq!(scores.total(), 4);
    }

    #[test]
    fn test_missing_file_is_empty_tally() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("scores.toml"));
        assert_eq!(store.load().unwrap(), ScoreBoard::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("scores.toml"));
        let mut scores = ScoreBoard::default();
        scores.record(Outcome::ComputerWin);
        store.save(&scores).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("computerWins = 1"));
        assert_eq!(store.load().unwrap(), scores);
    }

    #[test]
    fn test_garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.toml");
        std::fs::write(&path, "humanWins = \"lots\"").unwrap();
        assert!(ScoreStore::new(path).load().is_err());
    }
}
