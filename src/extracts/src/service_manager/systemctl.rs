use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gaia_common::config::Config;
use gaia_common::constants::SYSTEMCTL;
use gaia_common::utils::command::{CommandRunner, CommandSpec};
use tracing::{debug, error};

use super::parser::{parse_listing, ColumnUnitParser, UnitLineParser};
use super::UnitLister;

/// Lists service units through `systemctl list-units`.
pub struct SystemctlUnitLister {
    runner: Arc<dyn CommandRunner>,
    parser: Box<dyn UnitLineParser>,
    marker: String,
    timeout: Duration,
}

impl SystemctlUnitLister {
    pub fn new(runner: Arc<dyn CommandRunner>, config: &Config) -> Self {
        Self {
            runner,
            parser: Box::new(ColumnUnitParser::default()),
            marker: config.worker_marker.clone(),
            timeout: config.command_timeout(),
        }
    }

    pub fn with_parser(mut self, parser: Box<dyn UnitLineParser>) -> Self {
        self.parser = parser;
        self
    }

    fn list_command(&self) -> CommandSpec {
        CommandSpec::new(SYSTEMCTL, self.timeout).args(["list-units", "--type=service", "--all"])
    }
}

#[async_trait]
impl UnitLister for SystemctlUnitLister {
    #[tracing::instrument(skip(self))]
    async fn list_units(&self) -> BTreeMap<String, String> {
        match self.runner.run(&self.list_command()).await {
            Ok(output) => {
                let units = parse_listing(self.parser.as_ref(), &self.marker, &output.stdout);
                debug!("systemctl units matching {:?}: {:?}", self.marker, units);
                units
            }
            Err(e) => {
                error!("Error running systemctl: {e}");
                BTreeMap::new()
            }
        }
    }
}
