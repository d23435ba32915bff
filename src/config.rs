//! Engine configuration loaded from TOML.

use crate::ai::Difficulty;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding [`EngineConfig::seed`].
pub const SEED_ENV: &str = "TICTACTOE_SEED";

/// Environment variable overriding [`EngineConfig::think_delay_ms`].
pub const THINK_DELAY_ENV: &str = "TICTACTOE_THINK_DELAY_MS";

/// Settings for a game session and its front end.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pause before the computer answers, in milliseconds. Zero answers inline.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,

    /// Seed for the Easy and Medium opponents' random choices.
    #[serde(default)]
    seed: Option<u64>,

    /// Mode to start in without asking.
    #[serde(default)]
    difficulty: Option<Difficulty>,
}

fn default_think_delay_ms() -> u64 {
    500
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            think_delay_ms: default_think_delay_ms(),
            seed: None,
            difficulty: None,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from TOML file.
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

    /// Applies `TICTACTOE_SEED` / `TICTACTOE_THINK_DELAY_MS` overrides.
    #[instrument(skip(self, lookup))]
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(SEED_ENV) {
            let seed = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid {}: {}", SEED_ENV, e)))?;
            debug!(seed, "Seed overridden from environment");
            self.seed = Some(seed);
        }
        if let Some(raw) = lookup(THINK_DELAY_ENV) {
            self.think_delay_ms = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid {}: {}", THINK_DELAY_ENV, e)))?;
            debug!(think_delay_ms = self.think_delay_ms, "Delay overridden from environment");
        }
        Ok(self)
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// The thinking pause as a duration.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    /// Replaces the seed.
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    /// Replaces the starting mode.
    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.difficulty = difficulty;
    }

    /// Replaces the thinking pause.
    pub fn set_think_delay_ms(&mut self, think_delay_ms: u64) {
        self.think_delay_ms = think_delay_ms;
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
