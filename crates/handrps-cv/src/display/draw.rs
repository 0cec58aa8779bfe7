//! Drawing overlays and hand skeletons onto frames

use crate::Result;
use handrps_core::game::Overlay;
use handrps_core::HandLandmarks;
use opencv::{
    core::{Mat, Point, Scalar},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};

const LANDMARK_COLOR: (u8, u8, u8) = (255, 0, 0);
const CONNECTION_COLOR: (u8, u8, u8) = (255, 255, 255);
const LANDMARK_RADIUS: i32 = 4;

/// OpenCV color scalar (BGR) from an RGB triple
pub fn bgr_scalar(rgb: (u8, u8, u8)) -> Scalar {
    Scalar::new(
        rgb.2 as f64, // B
        rgb.1 as f64, // G
        rgb.0 as f64, // R
        255.0,
    )
}

pub fn draw_overlays(image: &mut Mat, overlays: &[Overlay]) -> Result<()> {
    for overlay in overlays {
        imgproc::put_text(
            image,
            &overlay.text,
            Point::new(overlay.origin.0, overlay.origin.1),
            FONT_HERSHEY_SIMPLEX,
            overlay.scale,
            bgr_scalar(overlay.color),
            overlay.thickness,
            LINE_8,
            false,
        )?;
    }
    Ok(())
}

/// Draw the hand skeleton, then the landmark points on top.
pub fn draw_hand(image: &mut Mat, hand: &HandLandmarks) -> Result<()> {
    let (width, height) = (image.cols(), image.rows());
    let to_point = |(x, y): (i32, i32)| Point::new(x, y);

    for (a, b) in hand.segments() {
        imgproc::line(
            image,
            to_point(a.to_pixel(width, height)),
            to_point(b.to_pixel(width, height)),
            bgr_scalar(CONNECTION_COLOR),
            2,
            LINE_8,
            0,
        )?;
    }

    for landmark in &hand.landmarks {
        imgproc::circle(
            image,
            to_point(landmark.to_pixel(width, height)),
            LANDMARK_RADIUS,
            bgr_scalar(LANDMARK_COLOR),
            -1,
            LINE_8,
            0,
        )?;
    }
    Ok(())
}
