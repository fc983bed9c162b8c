//! Log file setup.
//!
//! The TUI owns the terminal, so logs go to `${SHELF_HOME}/logs/shelf.log`.
//! Filtering follows `SHELF_LOG` (e.g. `SHELF_LOG=shelf_core=debug`),
//! defaulting to `info`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::paths;

pub const LOG_ENV: &str = "SHELF_LOG";
pub const LOG_FILE: &str = "shelf.log";

/// Installs the global subscriber writing to the default log directory.
/// Keep the returned guard alive until exit so buffered lines are flushed.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a global
/// subscriber is already set.
pub fn init() -> Result<WorkerGuard> {
    init_in(&paths::logs_dir())
}

/// Installs the global subscriber writing to `dir/shelf.log`.
///
/// # Errors
/// Returns an error if the directory cannot be created or a global
/// subscriber is already set.
pub fn init_in(dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(guard)
}
