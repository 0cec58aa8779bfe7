//! Text overlays for each phase

use super::state::{Game, Phase};
use serde::Serialize;

pub const GREEN: (u8, u8, u8) = (0, 255, 0);
pub const BLUE: (u8, u8, u8) = (0, 0, 255);
pub const RED: (u8, u8, u8) = (255, 0, 0);
pub const WHITE: (u8, u8, u8) = (255, 255, 255);

pub const QUIT_HINT: &str = "Press 'q' or 'ESC' to quit";

/// One line of text to draw over the frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub text: String,
    /// Bottom-left corner of the text in pixels
    pub origin: (i32, i32),
    pub scale: f64,
    /// RGB
    pub color: (u8, u8, u8),
    pub thickness: i32,
}

impl Overlay {
    pub fn new(text: impl Into<String>, origin: (i32, i32), scale: f64, color: (u8, u8, u8), thickness: i32) -> Self {
        Self {
            text: text.into(),
            origin,
            scale,
            color,
            thickness,
        }
    }
}

/// Overlays for the current state of `game` on a `width` x `height` frame.
///
/// The score and the quit hint are always present.
pub fn layout_overlays<R>(game: &Game<R>, width: i32, height: i32) -> Vec<Overlay> {
    let mut overlays = Vec::new();

    match game.phase {
        Phase::Waiting => {
            overlays.push(Overlay::new("Show hand to start!", (width / 4, 50), 1.0, GREEN, 2));
        }
        Phase::Countdown => {
            overlays.push(Overlay::new(game.countdown.to_string(), (width / 2, height / 2), 4.0, BLUE, 4));
        }
        Phase::Playing => {}
        Phase::Result => {
            if let (Some(player), Some(computer)) = (game.player_choice, game.computer_choice) {
                overlays.push(Overlay::new(format!("Your choice: {}", player), (10, 50), 1.0, GREEN, 2));
                overlays.push(Overlay::new(format!("Computer: {}", computer), (10, 100), 1.0, RED, 2));
            }
            if let Some(outcome) = game.outcome {
                overlays.push(Overlay::new(outcome.message(), (width / 4, height / 2), 2.0, BLUE, 3));
            }
        }
    }

    let score = format!("Score - You: {} Computer: {}", game.score.player, game.score.computer);
    overlays.push(Overlay::new(score, (10, height - 20), 0.7, WHITE, 2));
    overlays.push(Overlay::new(QUIT_HINT, (10, height - 50), 0.7, WHITE, 2));

    overlays
}
