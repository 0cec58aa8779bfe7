use crate::config::AppConfig;
use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Play Rock-Paper-Scissors against the computer with hand gestures in front of a webcam.
#[derive(Debug, Parser)]
#[command(name = "handrps", version = handrps_core::VERSION)]
pub struct Args {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Camera device index
    #[arg(long)]
    pub camera: Option<i32>,

    /// Do not mirror camera frames
    #[arg(long)]
    pub no_mirror: bool,

    /// Maximum number of hands the tracker reports
    #[arg(long)]
    pub max_hands: Option<u32>,

    #[arg(long)]
    pub min_detection_confidence: Option<f32>,

    #[arg(long)]
    pub min_tracking_confidence: Option<f32>,

    /// Interpreter for the tracker script
    #[arg(long)]
    pub tracker_program: Option<String>,

    #[arg(long)]
    pub tracker_script: Option<PathBuf>,

    /// Seed for the computer's choices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Terminal log level
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    #[arg(long, default_value = "logs/game.log")]
    pub log_file: PathBuf,

    /// Log to the terminal only
    #[arg(long)]
    pub no_log_file: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Configuration file (or defaults) with flags applied on top, validated.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut AppConfig) {
        if let Some(index) = self.camera {
            config.camera.index = index;
        }
        if self.no_mirror {
            config.camera.mirror = false;
        }
        if let Some(hands) = self.max_hands {
            config.tracker.max_num_hands = hands;
        }
        if let Some(confidence) = self.min_detection_confidence {
            config.tracker.min_detection_confidence = confidence;
        }
        if let Some(confidence) = self.min_tracking_confidence {
            config.tracker.min_tracking_confidence = confidence;
        }
        if let Some(program) = &self.tracker_program {
            config.tracker.program = program.clone();
        }
        if let Some(script) = &self.tracker_script {
            config.tracker.script = script.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }

    pub fn log_file(&self) -> Option<&PathBuf> {
        (!self.no_log_file).then_some(&self.log_file)
    }
}
