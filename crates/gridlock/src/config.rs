//! Match configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use gridlock_tictactoe::{Difficulty, Mark};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Timing and opponent settings for a match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Pause before the computer answers a move, in milliseconds.
    #[serde(default = "default_computer_delay_ms")]
    computer_delay_ms: u64,

    /// How long a result stays on the board before it clears, in milliseconds.
    #[serde(default = "default_auto_reset_ms")]
    auto_reset_ms: u64,

    /// Minimum spacing between throttled board syncs, in milliseconds.
    #[serde(default = "default_sync_interval_ms")]
    sync_interval_ms: u64,

    /// Computer difficulty when none is given on the command line.
    #[serde(default)]
    difficulty: Difficulty,

    /// Mark the computer plays.
    #[serde(default = "default_computer_mark")]
    computer_mark: Mark,

    /// Fixed RNG seed for reproducible computer play.
    #[serde(default)]
    seed: Option<u64>,

    /// TCP port a host listens on.
    #[serde(default = "default_port")]
    port: u16,
}

fn default_computer_delay_ms() -> u64 {
    500
}

fn default_auto_reset_ms() -> u64 {
    2000
}

fn default_sync_interval_ms() -> u64 {
    500
}

fn default_computer_mark() -> Mark {
    Mark::O
}

fn default_port() -> u16 {
    4747
}

impl MatchConfig {
    /// Loads configuration from a TOML file. Missing keys take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(?config, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Uses a different computer difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Fixes the computer's RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Uses a different host port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Delay before the computer moves.
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }

    /// Delay between a result and the automatic clear.
    pub fn auto_reset_delay(&self) -> Duration {
        Duration::from_millis(self.auto_reset_ms)
    }

    /// Sync throttle interval.
    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms)
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            computer_delay_ms: default_computer_delay_ms(),
            auto_reset_ms: default_auto_reset_ms(),
            sync_interval_ms: default_sync_interval_ms(),
            difficulty: Difficulty::default(),
            computer_mark: default_computer_mark(),
            seed: None,
            port: default_port(),
        }
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
    fn test_empty_toml_gives_defaults() {
        let config = MatchConfig::from_toml("").unwrap();
        assert_eq!(config, MatchConfig::default());
        assert_eq!(config.auto_reset_delay(), Duration::from_secs(2));
        assert_eq!(config.computer_delay(), Duration::from_millis(500));
        assert_eq!(*config.computer_mark(), Mark::O);
    }

    #[test]
    fn test_toml_overrides() {
        let config = MatchConfig::from_toml(
            r#"
            difficulty = "pro"
            computer_mark = "X"
            seed = 7
            auto_reset_ms = 1500
            "#,
        )
        .unwrap();
        assert_eq!(*config.difficulty(), Difficulty::Pro);
        assert_eq!(*config.computer_mark(), Mark::X);
        assert_eq!(*config.seed(), Some(7));
        assert_eq!(config.auto_reset_delay(), Duration::from_millis(1500));
        assert_eq!(*config.port(), 4747);
    }

    #[test]
    fn test_bad_toml_reports_location() {
        let err = MatchConfig::from_toml("difficulty = \"grandmaster\"").unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridlock.toml");
        std::fs::write(&path, "port = 9000\n").unwrap();
        let config = MatchConfig::from_file(&path).unwrap();
        assert_eq!(*config.port(), 9000);

        assert!(MatchConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
