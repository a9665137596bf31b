use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::board::MIN_PALETTE_SIZE;
use crate::error::ConfigError;

/// Settings for a game session, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {

    /// Number of tile types. The classic game uses seven colors.
    pub palette_size: u8,

    /// Seed for the tile generator. Games with the same seed and the same
    /// moves play out identically. Without a seed, every game is different.
    pub seed: Option<u64>,

    /// How many random boards a new game may generate before giving up on
    /// finding one that has a legal move.
    pub max_generation_attempts: u32

}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            palette_size: 7,
            seed: None,
            max_generation_attempts: 1000
        }
    }
}

impl EngineConfig {

    /// Parses and validates a configuration from TOML text. Missing keys
    /// keep their default values.
    ///
    /// # Arguments
    ///
    /// * `content` - the TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - the file to read
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Checks that the settings describe a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette_size < MIN_PALETTE_SIZE {
            return Err(ConfigError::Validation(format!(
                "palette_size must be at least 2, got {}", self.palette_size
            )));
        }

        if self.max_generation_attempts == 0 {
            return Err(ConfigError::Validation("max_generation_attempts must be at least 1".to_string()));
        }

        Ok(())
    }

}
