//! Logging setup for arxiv-digest.
//!
//! Logs go to stderr so that `--dry-run` output on stdout stays readable.
//! When `[logging] file` is set, a second plain-text layer appends to it.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Map a configured level name to a tracing level, defaulting to info.
fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Level used for this run; `--verbose` wins over the config.
pub fn effective_level(config: &LoggingConfig, verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        parse_level(&config.level)
    }
}

/// Open the log file for appending, creating its directory if needed.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Install the global subscriber.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = effective_level(config, verbose);

    let file_layer = if config.file.is_empty() {
        None
    } else {
        let file = Arc::new(open_log_file(Path::new(&config.file))?);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(false),
        )
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Stderr-only logging, used when the log file cannot be opened.
pub fn init_console_fallback(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(parse_level(level).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
