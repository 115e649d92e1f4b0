//! Miner configuration
//!
//! Stored as JSON. Missing fields fall back to their defaults, and CLI
//! flags override whatever the file says.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::algorithm::{DEFAULT_ROUNDS, MAX_ROUNDS, MIN_ROUNDS};

/// Nonces handed to the worker pool per search batch
pub const DEFAULT_BATCH_SIZE: u64 = 100_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Miner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Mix rounds per nonce; must match the network's value
    pub rounds: usize,
    /// Worker threads for nonce search
    pub threads: usize,
    /// Nonces per search batch (progress is reported between batches)
    pub batch_size: u64,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            threads: num_cpus::get(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl MinerConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&self.rounds) {
            return Err(ConfigError::Invalid(format!(
                "rounds must be {}-{}, got {}",
                MIN_ROUNDS, MAX_ROUNDS, self.rounds
            )));
        }
        if self.threads == 0 {
            return Err(ConfigError::Invalid("threads must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MinerConfig::default();
        assert_eq!(config.rounds, 512);
        assert!(config.threads >= 1);
        config.validate().unwrap();
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("miner.json");

        let config = MinerConfig {
            rounds: 1024,
            threads: 3,
            batch_size: 5_000,
        };
        config.save(&path).unwrap();

        assert_eq!(MinerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("miner.json");
        fs::write(&path, r#"{ "rounds": 256 }"#).unwrap();

        let config = MinerConfig::load(&path).unwrap();
        assert_eq!(config.rounds, 256);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("miner.json");

        fs::write(&path, r#"{ "rounds": 4096 }"#).unwrap();
        assert!(matches!(
            MinerConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));

        fs::write(&path, r#"{ "threads": 0 }"#).unwrap();
        assert!(matches!(
            MinerConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(MinerConfig::load(&path), Err(ConfigError::Parse(_))));

        assert!(matches!(
            MinerConfig::load(&dir.path().join("missing.json")),
            Err(ConfigError::FileError(_))
        ));
    }
}
