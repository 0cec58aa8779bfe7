//! Handrps Computer Vision Library
//!
//! OpenCV camera and window plus the MediaPipe hand tracker bridge, each implementing one of the
//! capability traits from `handrps_core::game::session`.

pub mod camera;
pub mod config;
pub mod display;
pub mod tracker;
pub mod utils;

// Re-export commonly used types
pub use camera::{Camera, VideoFrame};
pub use config::{CameraConfig, DisplayConfig, TrackerConfig};
pub use display::Window;
pub use tracker::HandTracker;

// Error handling
pub type Result<T> = anyhow::Result<T>;
