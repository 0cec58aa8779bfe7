use anyhow::{Context, Result};
use log::LevelFilter;
use std::path::Path;

/// Initialize terminal logging at `level`, plus DEBUG-level file logging when `file` is given.
pub fn init(level: LevelFilter, file: Option<&Path>) -> Result<()> {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Debug)
        .build();

    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = vec![simplelog::TermLogger::new(
        level,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if let Some(path) = file {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("Failed to create log directory: {:?}", dir))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {:?}", path))?;
        loggers.push(simplelog::WriteLogger::new(LevelFilter::Debug, config, file));
    }

    simplelog::CombinedLogger::init(loggers).context("Failed to initialize logger")
}
