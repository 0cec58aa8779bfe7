//! Window output and overlay drawing

pub mod draw;
pub mod window;

pub use window::Window;
