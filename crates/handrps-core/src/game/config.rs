//! Round timing configuration

use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing of a single round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Value the countdown starts from
    pub countdown_start: u32,
    /// Wall-clock time between countdown steps
    pub tick_interval_ms: u64,
    /// How long the result stays on screen before the next round
    pub result_display_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            countdown_start: 3,
            tick_interval_ms: 1000,
            result_display_ms: 2000,
        }
    }
}

impl GameConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn result_display(&self) -> Duration {
        Duration::from_millis(self.result_display_ms)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.countdown_start == 0 {
            return Err(GameError::Config("countdown_start must be at least 1".into()));
        }
        Ok(())
    }
}
