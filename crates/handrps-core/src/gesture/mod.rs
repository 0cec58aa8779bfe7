//! Gestures and the landmark data they are read from

pub mod classifier;
pub mod landmarks;

pub use classifier::{classify, detect_gesture};
pub use landmarks::{HandLandmarks, Landmark, HAND_CONNECTIONS};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hand shape the player (or the computer) throws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gesture {
    Rock,
    Paper,
    Scissors,
}

impl Gesture {
    pub const ALL: [Gesture; 3] = [Gesture::Rock, Gesture::Paper, Gesture::Scissors];

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Rock => "ROCK",
            Gesture::Paper => "PAPER",
            Gesture::Scissors => "SCISSORS",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
