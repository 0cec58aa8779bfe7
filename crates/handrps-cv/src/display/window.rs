//! HighGUI window

use super::draw::{draw_hand, draw_overlays};
use crate::camera::VideoFrame;
use crate::config::DisplayConfig;
use crate::Result;
use anyhow::Context;
use handrps_core::game::{Display, Overlay};
use handrps_core::{GameError, HandLandmarks};
use opencv::highgui;

/// Named OpenCV window, destroyed on drop
pub struct Window {
    title: String,
    draw_landmarks: bool,
    key_wait_ms: i32,
}

impl Window {
    pub fn open(config: &DisplayConfig) -> Result<Self> {
        highgui::named_window(&config.window_title, highgui::WINDOW_AUTOSIZE).map_err(|e| {
            GameError::ResourceInitialization(format!("Failed to open window: {}", e))
        })?;

        Ok(Self {
            title: config.window_title.clone(),
            draw_landmarks: config.draw_landmarks,
            key_wait_ms: config.key_wait_ms.max(1),
        })
    }
}

impl Display<VideoFrame> for Window {
    fn render(&mut self, frame: &mut VideoFrame, hand: Option<&HandLandmarks>, overlays: &[Overlay]) -> Result<()> {
        if let Some(hand) = hand.filter(|_| self.draw_landmarks) {
            draw_hand(&mut frame.mat, hand)?;
        }
        draw_overlays(&mut frame.mat, overlays)?;
        highgui::imshow(&self.title, &frame.mat).context("Failed to show frame")?;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<i32>> {
        let key = highgui::wait_key(self.key_wait_ms)?;
        Ok((key >= 0).then_some(key))
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_all_windows() {
            log::warn!("Failed to close window: {}", e);
        }
    }
}
