use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use gaia_common::config::Config;
use gaia_common::constants::SYSTEMCTL;
use gaia_common::utils::command::{CommandRunner, CommandSpec};
use tracing::info;

/// What to restart: a logical queue name resolved through the config, or a unit name
/// taken verbatim from the service manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestartTarget {
    Queue(String),
    Unit(String),
}

impl fmt::Display for RestartTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartTarget::Queue(queue) => write!(f, "queue {queue}"),
            RestartTarget::Unit(unit) => write!(f, "unit {unit}"),
        }
    }
}

#[async_trait]
pub trait ServiceController: Send + Sync {
    async fn restart(&self, target: &RestartTarget) -> Result<()>;
}

/// Restarts units with `systemctl restart`.
pub struct SystemctlController {
    runner: Arc<dyn CommandRunner>,
    config: Arc<Config>,
}

impl SystemctlController {
    pub fn new(runner: Arc<dyn CommandRunner>, config: Arc<Config>) -> Self {
        Self { runner, config }
    }

    pub fn resolve_unit<'a>(&'a self, target: &'a RestartTarget) -> Result<&'a str> {
        match target {
            RestartTarget::Unit(unit) => Ok(unit.as_str()),
            RestartTarget::Queue(queue) => self.config.unit_for_queue(queue).ok_or_else(|| {
                anyhow!(
                    "no service unit is mapped to worker `{queue}` in {:?}",
                    self.config.config_source
                )
            }),
        }
    }
}

#[async_trait]
impl ServiceController for SystemctlController {
    #[tracing::instrument(skip(self))]
    async fn restart(&self, target: &RestartTarget) -> Result<()> {
        let unit = self.resolve_unit(target)?;
        info!("Restarting Celery Worker: {target} ({unit})");

        let command =
            CommandSpec::new(SYSTEMCTL, self.config.command_timeout()).args(["restart", unit]);
        self.runner
            .run(&command)
            .await
            .with_context(|| format!("Error restarting worker {unit}"))?;

        Ok(())
    }
}
