use thiserror::Error;

/// Failures the game knows how to name.
///
/// `GestureDetection` is recovered per frame by the session loop. The others are fatal for the run
/// and reach `main` wrapped in an [`anyhow::Error`].
#[derive(Debug, Error)]
pub enum GameError {
    /// Video source could not be opened or a frame could not be read.
    #[error("camera error: {0}")]
    Camera(String),

    /// Landmark data was missing or malformed during classification.
    #[error("gesture detection failed: {0}")]
    GestureDetection(String),

    /// External model or other resource could not be set up.
    #[error("resource initialization failed: {0}")]
    ResourceInitialization(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
