// src/logging.rs
// =============================================================================
// Structured logging setup.
//
// Log lines go to stderr so stdout stays clean for the report (the JSON
// report in particular must be pipeable). `RUST_LOG` wins when set;
// otherwise the level comes from `--log-level`.
// =============================================================================

use anyhow::{anyhow, Result};
use std::io::IsTerminal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Maps the numeric `--log-level` (0-6, higher is more verbose) to a filter.
///
/// 0-2 only show errors, 3 adds warnings, 4 info, 5 debug and 6 trace.
pub fn level_filter(level: u8) -> LevelFilter {
    match level {
        0..=2 => LevelFilter::ERROR,
        3 => LevelFilter::WARN,
        4 => LevelFilter::INFO,
        5 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber. Call once, as early as possible.
pub fn init_logging(level: u8) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_filter(level).into()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    tracing::debug!("Log level: {}", level_filter(level));

    Ok(())
}
