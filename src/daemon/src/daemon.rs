use std::sync::Arc;

use anyhow::{Context, Result};
use gaia_common::config::Config;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::monitor::Monitor;

#[tokio::main]
pub async fn run(config: Config) -> Result<()> {
    info!(
        "Monitoring project {} at {:?} with config {:?}",
        config.project_name, config.project_wd, config.config_source
    );

    let monitor = Monitor::from_config(Arc::new(config)).context("Failed to create Monitor")?;

    let cancellation_token = CancellationToken::new();
    tokio::spawn(cancel_on_shutdown_signal(cancellation_token.clone()));

    monitor.run(cancellation_token).await;
    Ok(())
}

/// Cancels `cancellation_token` on Ctrl-C or SIGTERM.
pub async fn cancel_on_shutdown_signal(cancellation_token: CancellationToken) {
    wait_for_shutdown_signal().await;
    info!("Shutdown signal received");
    cancellation_token.cancel();
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {e}");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
