//! Handrps Core Library
//!
//! Gesture classification and the round state machine for webcam Rock-Paper-Scissors.
//! Nothing in here touches a camera or a window: the frame loop talks to those through the
//! capability traits in [`game::session`].

pub mod error;
pub mod game;
pub mod gesture;

// Re-export commonly used types
pub use error::GameError;
pub use game::{Game, GameConfig, Outcome, Phase, Score};
pub use gesture::{Gesture, HandLandmarks, Landmark};

pub type Result<T> = anyhow::Result<T>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
