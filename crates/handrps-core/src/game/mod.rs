//! Round state machine and the frame loop that drives it

pub mod config;
pub mod overlay;
pub mod session;
pub mod state;

pub use config::GameConfig;
pub use overlay::{Overlay, layout_overlays};
pub use session::{Display, Frame, HandDetector, Session, Stop, VideoSource};
pub use state::{Game, Outcome, Phase, Score};
