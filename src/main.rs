use anyhow::Result;
use clap::Parser;
use handrps_core::game::{Session, Stop};
use handrps_core::{Game, GameError, Score};
use handrps_cv::{Camera, HandTracker, Window};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

mod cli;
mod config;
mod logging;

use config::AppConfig;

fn main() -> ExitCode {
    let args = cli::Args::parse();

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            return ExitCode::FAILURE;
        }
    };

    if args.print_config {
        return match config.to_json() {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{:#}", e);
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = logging::init(args.log_level, args.log_file().map(|p| p.as_path())) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
        log::warn!("Interrupt handler not installed: {}", e);
    }

    match run(&config, interrupted) {
        Ok((stop, score)) => {
            log::info!("Final score - {}", score);
            if stop == Stop::Interrupted {
                println!("Game interrupted by user");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{:#}", e);
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(e: &anyhow::Error) {
    eprintln!("{}", error_message(e));
}

/// `GameError`s anywhere in the chain are game errors, everything else is unexpected.
fn error_message(e: &anyhow::Error) -> String {
    match e.chain().find_map(|cause| cause.downcast_ref::<GameError>()) {
        Some(game_error) => format!("Game error: {}", game_error),
        None => format!("Unexpected error: {:#}", e),
    }
}

fn run(config: &AppConfig, interrupted: Arc<AtomicBool>) -> Result<(Stop, Score)> {
    log::info!("Initializing Rock Paper Scissors game v{}", handrps_core::VERSION);

    let tracker = HandTracker::spawn(&config.tracker)?;
    let camera = Camera::open(&config.camera)?;
    let window = Window::open(&config.display)?;

    let game = match config.seed {
        Some(seed) => Game::seeded(config.game.clone(), seed),
        None => Game::new(config.game.clone()),
    };
    log::debug!("Game initialized with default state");

    let mut session = Session::new(camera, tracker, window, game).with_interrupt(interrupted);
    session.run()
}
