//! Engine configuration
//!
//! Every field has a default, so a partial JSON document is enough.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::ConfigError;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Entity slots (also the length of both settings vectors)
    pub capacity: usize,
    /// Seed for the collectible spawner
    pub seed: u64,
    /// Length of one round in seconds
    pub round_seconds: f32,
    /// Collectibles released over one round
    pub collectible_budget: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: ENTITY_MAX,
            seed: DEFAULT_SEED,
            round_seconds: ROUND_SECONDS,
            collectible_budget: COLLECTIBLE_BUDGET,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity < MIN_CAPACITY {
            return Err(ConfigError::CapacityTooSmall {
                capacity: self.capacity,
                min: MIN_CAPACITY,
            });
        }
        if !self.round_seconds.is_finite() || self.round_seconds <= 0.0 {
            return Err(ConfigError::InvalidRoundLength(self.round_seconds));
        }
        Ok(())
    }
}
