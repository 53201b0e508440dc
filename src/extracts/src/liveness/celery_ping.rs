use std::sync::Arc;

use async_trait::async_trait;
use gaia_common::config::Config;
use gaia_common::constants::DEFAULT_QUEUE_NAME;
use gaia_common::utils::command::{CommandRunner, CommandSpec};
use gaia_common::utils::hostname::resolve_hostname;
use tracing::{debug, error, info, warn};

use super::LivenessProber;

/// Pings a worker with `celery inspect ping -d celery@<worker>` from the project directory.
pub struct CeleryPingProber {
    runner: Arc<dyn CommandRunner>,
    config: Arc<Config>,
}

impl CeleryPingProber {
    pub fn new(runner: Arc<dyn CommandRunner>, config: Arc<Config>) -> Self {
        Self { runner, config }
    }

    /// Workers started without `-Q` are named after the host.
    async fn resolve_worker(&self, queue: &str) -> Option<String> {
        if queue == DEFAULT_QUEUE_NAME {
            resolve_hostname(self.runner.as_ref(), self.config.command_timeout()).await
        } else {
            Some(queue.to_string())
        }
    }

    pub fn ping_command(&self, worker: &str) -> CommandSpec {
        let app = self.config.celery_app();
        let destination = format!("celery@{worker}");

        CommandSpec::new(
            self.config.python_bin.to_string_lossy(),
            self.config.ping_timeout(),
        )
        .args([
            "-m",
            "celery",
            "-A",
            app.as_str(),
            "inspect",
            "ping",
            "-d",
            destination.as_str(),
        ])
        .current_dir(&self.config.project_wd)
    }
}

#[async_trait]
impl LivenessProber for CeleryPingProber {
    #[tracing::instrument(skip(self))]
    async fn ping(&self, queue: &str) -> bool {
        let Some(worker) = self.resolve_worker(queue).await else {
            error!("Could not resolve the worker name for queue {queue}");
            return false;
        };

        match self.runner.run(&self.ping_command(&worker)).await {
            Ok(output) => {
                debug!("Ping Output: {}", output.stdout);
                let alive = output.stdout.contains(worker.as_str());
                info!("Worker {worker} alive: {alive}");
                alive
            }
            Err(e) if e.is_timeout() => {
                warn!("Ping of worker {worker} timed out: {e}");
                false
            }
            Err(e) => {
                error!("Error executing ping command: {e}");
                false
            }
        }
    }
}
