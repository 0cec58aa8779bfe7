//! Frame loop over the camera, hand model and window
//!
//! The loop is single threaded: read a frame, find a hand, tick the game, draw, poll a key.
//! Collaborators are owned by the [`Session`] and released when it drops, so every exit path
//! (quit key, interrupt, error, unwinding) lets go of the camera and window exactly once.

use super::overlay::{Overlay, layout_overlays};
use super::state::{Game, Phase, Score};
use crate::gesture::{HandLandmarks, detect_gesture};
use crate::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

pub const KEY_ESC: i32 = 27;
pub const KEY_QUIT: i32 = b'q' as i32;

pub fn is_quit_key(key: i32) -> bool {
    let key = key & 0xFF;
    key == KEY_QUIT || key == KEY_ESC
}

/// An image the loop can measure
pub trait Frame {
    /// (width, height) in pixels
    fn dimensions(&self) -> (i32, i32);
}

/// Supplies frames on demand
pub trait VideoSource {
    type Frame: Frame;

    /// Next frame, or an error if the source is gone. Errors end the run.
    fn next_frame(&mut self) -> Result<Self::Frame>;
}

/// External hand landmark model
pub trait HandDetector<F> {
    /// First hand found in `frame`, if any.
    fn detect_hand(&mut self, frame: &F) -> Result<Option<HandLandmarks>>;
}

/// Window the game is shown in
pub trait Display<F> {
    fn render(&mut self, frame: &mut F, hand: Option<&HandLandmarks>, overlays: &[Overlay]) -> Result<()>;

    /// Key pressed since the last poll, without blocking for long.
    fn poll_key(&mut self) -> Result<Option<i32>>;
}

/// Why a run ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// Quit key pressed
    Quit,
    /// Interrupt flag raised from outside the loop
    Interrupted,
}

pub struct Session<V, H, D> {
    source: V,
    detector: H,
    display: D,
    interrupted: Arc<AtomicBool>,
    pub game: Game,
}

impl<V, H, D> Session<V, H, D>
where
    V: VideoSource,
    H: HandDetector<V::Frame>,
    D: Display<V::Frame>,
{
    pub fn new(source: V, detector: H, display: D, game: Game) -> Self {
        Self {
            source,
            detector,
            display,
            interrupted: Arc::new(AtomicBool::new(false)),
            game,
        }
    }

    /// Stop the loop once `flag` is set, e.g. from a Ctrl-C handler.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupted = flag;
        self
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }

    /// Run until the player quits or the interrupt flag is raised.
    ///
    /// An error raised after the interrupt (a collaborator torn down by the same signal) ends the
    /// run as interrupted rather than failed.
    pub fn run(&mut self) -> Result<(Stop, Score)> {
        log::info!("Starting game loop");
        loop {
            if self.is_interrupted() {
                log::info!("Game interrupted by user");
                return Ok((Stop::Interrupted, self.game.score));
            }
            match self.step(Instant::now()) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) if self.is_interrupted() => {
                    log::debug!("Ignoring error after interrupt: {:#}", e);
                }
                Err(e) => return Err(e),
            }
        }
        log::info!("Game terminated by user");
        Ok((Stop::Quit, self.game.score))
    }

    /// One loop iteration at time `now`. `false` once a quit key was pressed.
    pub fn step(&mut self, now: Instant) -> Result<bool> {
        let mut frame = self.source.next_frame()?;
        let hand = self.detector.detect_hand(&frame)?;

        let gesture = match (&hand, self.game.phase) {
            (Some(hand), Phase::Playing) => detect_gesture(hand).unwrap_or_else(|e| {
                log::error!("Gesture detection error: {}", e);
                None
            }),
            _ => None,
        };

        if let Some(phase) = self.game.tick(now, hand.is_some(), gesture) {
            log::debug!("Phase -> {}", phase);
        }

        let (width, height) = frame.dimensions();
        let overlays = layout_overlays(&self.game, width, height);
        self.display.render(&mut frame, hand.as_ref(), &overlays)?;

        let quit = self.display.poll_key()?.is_some_and(is_quit_key);
        Ok(!quit)
    }
}

impl<V, H, D> Drop for Session<V, H, D> {
    fn drop(&mut self) {
        log::info!("Cleaning up resources");
    }
}
