//! Finger-counting gesture classifier
//!
//! The thumb is judged on the x axis and the other fingers on the y axis. That only holds for a
//! horizontally mirrored frame showing a right hand with the palm to the camera; other
//! orientations misread the thumb.

use super::landmarks::{FINGER_BASES, FINGERTIPS, HandLandmarks, Landmark};
use super::Gesture;
use crate::error::GameError;

const THUMB: usize = 0;
const INDEX: usize = 1;
const MIDDLE: usize = 2;

/// Which of the five fingers are extended, thumb first.
pub fn fingers_extended(fingertips: &[Landmark; 5], bases: &[Landmark; 5]) -> [bool; 5] {
    let mut extended = [false; 5];
    for (i, (tip, base)) in fingertips.iter().zip(bases).enumerate() {
        extended[i] = if i == THUMB {
            tip.x < base.x
        } else {
            // smaller y is higher in the image
            tip.y < base.y
        };
    }
    extended
}

/// Classify a hand from its fingertip and finger-base positions.
///
/// Returns `None` when the pose is not one of the three gestures (for example three fingers up).
pub fn classify(fingertips: &[Landmark; 5], bases: &[Landmark; 5]) -> Option<Gesture> {
    classify_extended(&fingers_extended(fingertips, bases))
}

fn classify_extended(extended: &[bool; 5]) -> Option<Gesture> {
    let count = extended.iter().filter(|&&e| e).count();

    if count <= 1 {
        Some(Gesture::Rock)
    } else if count == 2 && extended[INDEX] && extended[MIDDLE] {
        Some(Gesture::Scissors)
    } else if count >= 4 {
        Some(Gesture::Paper)
    } else {
        None
    }
}

/// Pull the ten classifier landmarks out of a detected hand and classify it.
///
/// A hand without all of them is a [`GameError::GestureDetection`], not an unknown gesture.
pub fn detect_gesture(hand: &HandLandmarks) -> Result<Option<Gesture>, GameError> {
    let fingertips = pick(hand, &FINGERTIPS)?;
    let bases = pick(hand, &FINGER_BASES)?;
    Ok(classify(&fingertips, &bases))
}

fn pick(hand: &HandLandmarks, indices: &[usize; 5]) -> Result<[Landmark; 5], GameError> {
    let mut out = [Landmark::default(); 5];
    for (slot, &index) in out.iter_mut().zip(indices) {
        *slot = *hand.get(index).ok_or_else(|| {
            GameError::GestureDetection(format!(
                "landmark {} missing ({} points reported)",
                index,
                hand.landmarks.len()
            ))
        })?;
    }
    Ok(out)
}
