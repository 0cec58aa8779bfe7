//! Application configuration: JSON file, then command line overrides

use anyhow::{Context, Result};
use handrps_core::{GameConfig, GameError};
use handrps_cv::{CameraConfig, DisplayConfig, TrackerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub camera: CameraConfig,
    pub tracker: TrackerConfig,
    pub display: DisplayConfig,
    /// Seed for the computer opponent; random when absent
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Unreadable or malformed files are [`GameError::Config`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GameError::Config(format!("failed to read {:?}: {}", path, e)))?;
        let config = serde_json::from_str(&text)
            .map_err(|e| GameError::Config(format!("failed to parse {:?}: {}", path, e)))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.game.validate()?;
        self.tracker.validate()?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
