use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use gaia_common::config::ConfigLoader;
use gaia_daemon::daemon::run;

use crate::commands::{Cli, Command};
use crate::logging::setup_logging;
use crate::nondaemon_commands::{check, ping, print_units, print_workers, send_test_alert};

pub fn process_cli() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_dir.as_deref())?;

    // Use the --config flag, if provided, when loading the configuration
    let config = ConfigLoader::load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(config)?,
        Command::Check => {
            tokio::runtime::Runtime::new()?.block_on(check(Arc::new(config)))?;
        }
        Command::Workers => {
            tokio::runtime::Runtime::new()?.block_on(print_workers(&config))?;
        }
        Command::Units => {
            tokio::runtime::Runtime::new()?.block_on(print_units(&config))?;
        }
        Command::Ping { queue } => {
            tokio::runtime::Runtime::new()?.block_on(ping(Arc::new(config), &queue))?;
        }
        Command::Alert { message } => {
            tokio::runtime::Runtime::new()?.block_on(send_test_alert(&config, message))?;
        }
    }
    Ok(())
}
