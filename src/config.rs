//! Training configuration.
//!
//! ```json
//! {
//!   "epochs": 20,
//!   "batch_size": 64,
//!   "shuffle": true,
//!   "seed": 7,
//!   "learning_rate": 0.05
//! }
//! ```
//!
//! Missing fields take their defaults.

use crate::error::{Result, TrainError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for [`train_with_config`](crate::train::train_with_config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Number of passes over the training split.
    pub epochs: usize,
    /// Rows per batch; the final batch of a pass may be shorter.
    pub batch_size: usize,
    /// Shuffle rows every epoch.
    pub shuffle: bool,
    /// Seed for the shuffle. Ignored unless `shuffle` is set.
    pub seed: Option<u64>,
    /// Learning rate set on the optimizer by `train_with_config`.
    pub learning_rate: f32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            batch_size: 32,
            shuffle: false,
            seed: None,
            learning_rate: 0.01,
        }
    }
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        Self {
            epochs,
            batch_size,
            ..Self::default()
        }
    }

    pub fn with_shuffle(mut self, seed: Option<u64>) -> Self {
        self.shuffle = true;
        self.seed = seed;
        self
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(TrainError::InvalidConfig("epochs must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(TrainError::InvalidBatchSize);
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(TrainError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}
