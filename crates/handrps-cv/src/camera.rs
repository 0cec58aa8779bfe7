//! Webcam capture through OpenCV videoio

use crate::config::CameraConfig;
use crate::utils::ImageUtils;
use crate::Result;
use handrps_core::game::{Frame, VideoSource};
use handrps_core::GameError;
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture},
};

/// A captured BGR frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub mat: Mat,
}

impl Frame for VideoFrame {
    fn dimensions(&self) -> (i32, i32) {
        ImageUtils::dimensions(&self.mat)
    }
}

/// Open camera device, released on drop
pub struct Camera {
    capture: VideoCapture,
    mirror: bool,
}

impl Camera {
    /// Open the configured device.
    ///
    /// Fails with [`GameError::Camera`] if OpenCV cannot open it.
    pub fn open(config: &CameraConfig) -> Result<Self> {
        log::info!("Initializing camera {}", config.index);
        let capture = VideoCapture::new(config.index, videoio::CAP_ANY)
            .map_err(|e| GameError::Camera(format!("Failed to initialize camera: {}", e)))?;

        if !capture.is_opened()? {
            log::error!("Failed to initialize camera");
            return Err(GameError::Camera("Failed to initialize camera".into()).into());
        }
        log::debug!("Camera initialized successfully");

        Ok(Self {
            capture,
            mirror: config.mirror,
        })
    }
}

impl VideoSource for Camera {
    type Frame = VideoFrame;

    fn next_frame(&mut self) -> Result<VideoFrame> {
        let mut mat = Mat::default();
        let grabbed = self
            .capture
            .read(&mut mat)
            .map_err(|e| GameError::Camera(format!("Failed to capture video frame: {}", e)))?;

        if !grabbed || mat.empty() {
            log::error!("Failed to capture video frame");
            return Err(GameError::Camera("Failed to capture video frame".into()).into());
        }

        if self.mirror {
            mat = ImageUtils::flip_horizontal(&mat)?;
        }
        Ok(VideoFrame { mat })
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            log::warn!("Failed to release camera: {}", e);
        }
    }
}
