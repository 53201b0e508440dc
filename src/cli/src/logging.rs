use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    prelude::*,
    EnvFilter,
};

pub const LOG_FILE_NAME: &str = "gaia.log";

/// Installs the global subscriber: stdout always, plus a daily rolling file when
/// `log_dir` is set. Fails if a subscriber is already installed.
pub fn setup_logging(log_dir: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = fmt::layer().with_target(false).with_timer(SystemTime);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {dir:?}"))?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_NAME)
                .build(dir)
                .context("Failed to create log file appender")?;

            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_target(true)
                    .with_level(true)
                    .with_timer(SystemTime)
                    .with_writer(file_appender),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to set tracing subscriber")?;

    match log_dir {
        Some(dir) => tracing::info!("Logging system initialized. Writing to {dir:?}"),
        None => tracing::debug!("Logging system initialized"),
    }

    Ok(())
}
