//! MediaPipe hand landmark model run as a subprocess
//!
//! The script in `scripts/hand_landmarks.py` prints `READY` once the model is loaded. Each
//! request is a 12-byte header (width, height, channels as little-endian u32) followed by raw RGB
//! pixels; each reply is one JSON line:
//!
//! ```text
//! {"hands": [{"handedness": "Right", "score": 0.98, "landmarks": [{"x": .., "y": .., "z": ..}, ..]}], "error": null}
//! ```
//!
//! Replies are read on a separate thread so a stalled model cannot block the frame loop: every
//! wait is bounded by the configured startup or response timeout.

use crate::camera::VideoFrame;
use crate::config::TrackerConfig;
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use handrps_core::game::HandDetector;
use handrps_core::gesture::landmarks::LANDMARK_COUNT;
use handrps_core::{GameError, HandLandmarks};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const READY: &str = "READY";

#[derive(Debug, Deserialize)]
pub struct DetectionResponse {
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Parse one reply line from the tracker.
pub fn parse_response(line: &str) -> Result<DetectionResponse> {
    serde_json::from_str(line.trim())
        .with_context(|| format!("Failed to parse tracker response: {}", line.trim()))
}

/// Request header for a frame of the given size.
pub fn encode_header(width: u32, height: u32, channels: u32) -> [u8; 12] {
    let mut header = [0u8; 12];
    header[0..4].copy_from_slice(&width.to_le_bytes());
    header[4..8].copy_from_slice(&height.to_le_bytes());
    header[8..12].copy_from_slice(&channels.to_le_bytes());
    header
}

/// Forward lines from the tracker's stdout until it closes.
fn spawn_reader(stdout: ChildStdout) -> (Receiver<std::io::Result<String>>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    (rx, handle)
}

/// Hand tracker using MediaPipe via a child process
pub struct HandTracker {
    process: Child,
    stdin: ChildStdin,
    replies: Receiver<std::io::Result<String>>,
    reader: Option<JoinHandle<()>>,
    response_timeout: Duration,
}

impl HandTracker {
    /// Start the tracker and wait for it to load its model.
    ///
    /// Any failure here is a [`GameError::ResourceInitialization`].
    pub fn spawn(config: &TrackerConfig) -> Result<Self> {
        config.validate()?;
        if !config.script.exists() {
            return Err(GameError::ResourceInitialization(format!(
                "hand tracker script not found at {:?}",
                config.script
            ))
            .into());
        }

        log::info!("Starting hand tracker: {} {:?}", config.program, config.script);
        let mut process = Command::new(&config.program)
            .args(config.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                GameError::ResourceInitialization(format!("failed to start {}: {}", config.program, e))
            })?;

        let (Some(stdin), Some(stdout)) = (process.stdin.take(), process.stdout.take()) else {
            let _ = process.kill();
            return Err(GameError::ResourceInitialization("tracker pipes unavailable".into()).into());
        };
        let (replies, reader) = spawn_reader(stdout);
        let tracker = Self {
            process,
            stdin,
            replies,
            reader: Some(reader),
            response_timeout: config.response_timeout(),
        };

        let line = tracker
            .next_line(config.startup_timeout())
            .map_err(|e| GameError::ResourceInitialization(format!("tracker did not start: {:#}", e)))?;
        if line.trim() != READY {
            return Err(GameError::ResourceInitialization(format!(
                "tracker did not signal ready, got: {:?}",
                line.trim()
            ))
            .into());
        }

        log::info!("Hand tracker ready");
        Ok(tracker)
    }

    /// Detect hands in an RGB image.
    pub fn detect(&mut self, rgb: &image::RgbImage) -> Result<Vec<HandLandmarks>> {
        let (width, height) = rgb.dimensions();
        self.stdin
            .write_all(&encode_header(width, height, 3))
            .and_then(|_| self.stdin.write_all(rgb.as_raw()))
            .and_then(|_| self.stdin.flush())
            .context("Failed to send frame to hand tracker")?;

        let line = self.next_line(self.response_timeout)?;
        let response = parse_response(&line)?;
        if let Some(error) = response.error {
            log::warn!("Hand tracker error: {}", error);
            return Ok(Vec::new());
        }
        Ok(response.hands)
    }

    fn next_line(&self, timeout: Duration) -> Result<String> {
        match self.replies.recv_timeout(timeout) {
            Ok(line) => line.context("Failed to read hand tracker response"),
            Err(RecvTimeoutError::Timeout) => {
                anyhow::bail!("hand tracker did not respond within {} ms", timeout.as_millis())
            }
            Err(RecvTimeoutError::Disconnected) => anyhow::bail!("hand tracker exited unexpectedly"),
        }
    }
}

impl HandDetector<VideoFrame> for HandTracker {
    fn detect_hand(&mut self, frame: &VideoFrame) -> Result<Option<HandLandmarks>> {
        let rgb = ImageUtils::mat_to_rgb(&frame.mat)?;
        let hand = self.detect(&rgb)?.into_iter().next();

        if let Some(hand) = &hand {
            if !hand.is_complete() {
                log::debug!("Expected {} landmarks, got {}", LANDMARK_COUNT, hand.landmarks.len());
            }
            log::trace!("Hand detected: {} (confidence={:.2})", hand.handedness, hand.score);
        }
        Ok(hand)
    }
}

impl Drop for HandTracker {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = encode_header(640, 480, 3);
        assert_eq!(&header[0..4], &640u32.to_le_bytes());
        assert_eq!(&header[4..8], &480u32.to_le_bytes());
        assert_eq!(&header[8..12], &3u32.to_le_bytes());
    }

    #[test]
    fn test_parse_hand() -> Result<()> {
        let line = r#"{"hands": [{"handedness": "Right", "score": 0.93,
            "landmarks": [{"x": 0.1, "y": 0.2, "z": -0.01}, {"x": 0.3, "y": 0.4}]}], "error": null}"#;
        let response = parse_response(line)?;
        assert!(response.error.is_none());
        assert_eq!(response.hands.len(), 1);
        let hand = &response.hands[0];
        assert_eq!(hand.handedness, "Right");
        assert_eq!(hand.landmarks.len(), 2);
        assert_eq!(hand.landmarks[1].z, 0.0);
        Ok(())
    }

    #[test]
    fn test_parse_empty_and_error() -> Result<()> {
        assert!(parse_response("{\"hands\": []}\n")?.hands.is_empty());
        let response = parse_response(r#"{"error": "bad frame"}"#)?;
        assert_eq!(response.error.as_deref(), Some("bad frame"));
        assert!(parse_response("not json").is_err());
        Ok(())
    }

    #[test]
    fn test_missing_script_is_initialization_error() {
        let config = TrackerConfig {
            script: "does/not/exist.py".into(),
            ..Default::default()
        };
        let err = HandTracker::spawn(&config).err().expect("spawn should fail");
        assert!(matches!(
            err.downcast_ref::<GameError>(),
            Some(GameError::ResourceInitialization(_))
        ));
    }

    /// Tracker config running `body` as a shell script in place of the MediaPipe server.
    #[cfg(unix)]
    fn shell_tracker(name: &str, body: &str) -> Result<(TrackerConfig, std::path::PathBuf)> {
        let script = std::env::temp_dir().join(format!("handrps-{}-{}.sh", name, std::process::id()));
        std::fs::write(&script, body)?;
        let config = TrackerConfig {
            program: "sh".into(),
            script: script.clone(),
            startup_timeout_ms: 200,
            response_timeout_ms: 200,
            ..Default::default()
        };
        Ok((config, script))
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_tracker_fails_to_start() -> Result<()> {
        let (config, script) = shell_tracker("silent", "exec sleep 30\n")?;
        let started = std::time::Instant::now();
        let result = HandTracker::spawn(&config);
        std::fs::remove_file(&script)?;

        let err = result.err().expect("spawn should time out");
        assert!(matches!(
            err.downcast_ref::<GameError>(),
            Some(GameError::ResourceInitialization(_))
        ));
        assert!(started.elapsed() < Duration::from_secs(10));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_stalled_tracker_times_out() -> Result<()> {
        let (config, script) = shell_tracker("stalled", "echo READY\nexec sleep 30\n")?;
        let tracker = HandTracker::spawn(&config);
        std::fs::remove_file(&script)?;
        let mut tracker = tracker?;

        // small enough to fit in the pipe buffer unread
        let frame = image::RgbImage::new(4, 4);
        let started = std::time::Instant::now();
        let err = tracker.detect(&frame).unwrap_err();
        assert!(err.to_string().contains("did not respond"), "{:#}", err);
        assert!(started.elapsed() < Duration::from_secs(10));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_exited_tracker_is_an_error() -> Result<()> {
        let (config, script) = shell_tracker("exited", "echo READY\n")?;
        let tracker = HandTracker::spawn(&config);
        std::fs::remove_file(&script)?;
        let mut tracker = tracker?;

        assert!(tracker.detect(&image::RgbImage::new(4, 4)).is_err());
        Ok(())
    }
}
