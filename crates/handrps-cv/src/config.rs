//! Capture, tracking and display configuration

use handrps_core::GameError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Video capture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Device index passed to OpenCV (0 is the first camera)
    pub index: i32,
    /// Mirror frames horizontally before detection
    pub mirror: bool,
}

/// Hand landmark model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Interpreter used to run the tracker script
    pub program: String,
    pub script: PathBuf,
    pub static_image_mode: bool,
    pub max_num_hands: u32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    /// How long to wait for the model to load and print READY
    pub startup_timeout_ms: u64,
    /// How long to wait for the reply to one frame
    pub response_timeout_ms: u64,
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub window_title: String,
    pub draw_landmarks: bool,
    /// Milliseconds to wait for a key each frame
    pub key_wait_ms: i32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            mirror: true,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            program: "python3".into(),
            script: "scripts/hand_landmarks.py".into(),
            static_image_mode: false,
            max_num_hands: 1,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.7,
            startup_timeout_ms: 30_000,
            response_timeout_ms: 2_000,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_title: "Rock Paper Scissors".into(),
            draw_landmarks: true,
            key_wait_ms: 1,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GameError::Config(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }
        if self.max_num_hands == 0 {
            return Err(GameError::Config("max_num_hands must be at least 1".into()));
        }
        if self.startup_timeout_ms == 0 || self.response_timeout_ms == 0 {
            return Err(GameError::Config("tracker timeouts must be positive".into()));
        }
        Ok(())
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// Command line arguments for the tracker script
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            self.script.to_string_lossy().to_string(),
            "--max-num-hands".into(),
            self.max_num_hands.to_string(),
            "--min-detection-confidence".into(),
            self.min_detection_confidence.to_string(),
            "--min-tracking-confidence".into(),
            self.min_tracking_confidence.to_string(),
        ];
        if self.static_image_mode {
            args.push("--static-image-mode".into());
        }
        args
    }
}
