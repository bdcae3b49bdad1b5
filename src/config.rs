//! Application configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use noughts_rules::Difficulty;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Settings read from `noughts.toml`. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Identity used for online sessions.
    #[serde(default = "default_player_name")]
    player_name: String,

    /// AI strength for offline games.
    #[serde(default)]
    difficulty: Difficulty,

    /// Where the offline tally is kept.
    #[serde(default = "default_scores_path")]
    scores_path: PathBuf,

    /// Where the in-progress offline game is saved on exit.
    #[serde(default = "default_snapshot_path")]
    snapshot_path: PathBuf,
}

fn default_player_name() -> String {
    "player".to_string()
}

fn default_scores_path() -> PathBuf {
    PathBuf::from("noughts_scores.toml")
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("noughts_match.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            player_name: default_player_name(),
            difficulty: Difficulty::default(),
            scores_path: default_scores_path(),
            snapshot_path: default_snapshot_path(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(player_name = %config.player_name, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    ///
    /// A file that exists but does not parse is still an error.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces the player name.
    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    /// Replaces the AI strength.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(dir.path().join("noughts.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.player_name(), "player");
        assert_eq!(*config.difficulty(), Difficulty::Expert);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noughts.toml");
        std::fs::write(&path, "player_name = \"alice\"\ndifficulty = \"easy\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.player_name(), "alice");
        assert_eq!(*config.difficulty(), Difficulty::Easy);
        assert_eq!(config.scores_path(), &PathBuf::from("noughts_scores.toml"));
    }

    #[test]
    fn test_bad_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noughts.toml");
        std::fs::write(&path, "difficulty = \"impossible\"").unwrap();
        let err = AppConfig::load_or_default(&path).unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }
}
