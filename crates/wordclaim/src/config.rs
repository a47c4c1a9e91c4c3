//! Engine configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};
use wordclaim_rules::{
    ATTEMPT_TIMEOUT_UNITS, MAX_ATTEMPTS_PER_CELL, MAX_CELLS_PER_TURN, PREGAME_COUNTDOWN_UNITS,
};

/// Timing and rule limits for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Wall-clock length of one countdown unit, in milliseconds.
    #[serde(default = "default_tick_millis")]
    tick_millis: u64,

    /// Units a player has per attempt before it times out.
    #[serde(default = "default_attempt_timeout")]
    attempt_timeout: u32,

    /// Units counted down before play begins.
    #[serde(default = "default_pregame_countdown")]
    pregame_countdown: u32,

    /// Timed attempts per selected cell.
    #[serde(default = "default_max_attempts")]
    max_attempts_per_cell: u8,

    /// Exhausted cells per turn before the turn passes.
    #[serde(default = "default_max_cells")]
    max_cells_per_turn: u8,

    /// Recognition language hint passed to the speech capability.
    #[serde(default = "default_language")]
    language: String,

    /// Maximum candidate transcriptions requested per utterance.
    #[serde(default = "default_max_alternatives")]
    max_alternatives: u8,
}

fn default_tick_millis() -> u64 {
    1000
}

fn default_attempt_timeout() -> u32 {
    ATTEMPT_TIMEOUT_UNITS
}

fn default_pregame_countdown() -> u32 {
    PREGAME_COUNTDOWN_UNITS
}

fn default_max_attempts() -> u8 {
    MAX_ATTEMPTS_PER_CELL
}

fn default_max_cells() -> u8 {
    MAX_CELLS_PER_TURN
}

fn default_language() -> String {
    "zh-CN".to_string()
}

fn default_max_alternatives() -> u8 {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_millis: default_tick_millis(),
            attempt_timeout: default_attempt_timeout(),
            pregame_countdown: default_pregame_countdown(),
            max_attempts_per_cell: default_max_attempts(),
            max_cells_per_turn: default_max_cells(),
            language: default_language(),
            max_alternatives: default_max_alternatives(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(tick_millis = config.tick_millis, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Length of one countdown unit.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Returns a copy with a different unit length.
    pub fn with_tick_millis(mut self, tick_millis: u64) -> Self {
        self.tick_millis = tick_millis;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_millis == 0 {
            return Err(ConfigError::new("tick_millis must be positive".to_string()));
        }
        if self.attempt_timeout == 0 {
            return Err(ConfigError::new("attempt_timeout must be positive".to_string()));
        }
        if self.max_attempts_per_cell == 0 {
            return Err(ConfigError::new(
                "max_attempts_per_cell must be positive".to_string(),
            ));
        }
        if self.max_cells_per_turn == 0 {
            return Err(ConfigError::new("max_cells_per_turn must be positive".to_string()));
        }
        Ok(())
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
    fn test_empty_toml_uses_defaults() {
        let config = EngineConfig::from_toml("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(*config.attempt_timeout(), 5);
        assert_eq!(*config.max_cells_per_turn(), 2);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_toml("tick_millis = 250\nlanguage = \"en-US\"").unwrap();
        assert_eq!(config.tick(), Duration::from_millis(250));
        assert_eq!(config.language(), "en-US");
        assert_eq!(*config.max_attempts_per_cell(), 3);
    }

    #[test]
    fn test_zero_limits_rejected() {
        let err = EngineConfig::from_toml("max_attempts_per_cell = 0").unwrap_err();
        assert!(err.message.contains("max_attempts_per_cell"));
    }
}
