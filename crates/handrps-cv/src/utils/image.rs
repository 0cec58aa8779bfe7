//! Frame conversions using opencv-match

use crate::Result;
use anyhow::Context;
use opencv::{core::{self, Mat}, prelude::MatTraitConst};
use opencv_match::prelude::*;

/// Image utility functions for camera frames
pub struct ImageUtils;

impl ImageUtils {
    /// Convert a BGR camera Mat to image::RgbImage using opencv-match
    pub fn mat_to_rgb(mat: &Mat) -> Result<image::RgbImage> {
        mat.try_into_cv()
            .context("Failed to convert OpenCV Mat to RGB image")
    }

    /// Mirror a frame left to right
    pub fn flip_horizontal(mat: &Mat) -> Result<Mat> {
        let mut flipped = Mat::default();
        core::flip(mat, &mut flipped, 1).context("Failed to flip frame")?;
        Ok(flipped)
    }

    /// (width, height) of a Mat
    pub fn dimensions(mat: &Mat) -> (i32, i32) {
        (mat.cols(), mat.rows())
    }
}
