use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gaia_common::constants::{CONFIG_PATH_ENV_VAR, LOG_DIR_ENV_VAR};

#[derive(Parser, Clone, Debug)]
#[clap(
    name = "gaia",
    about = "Watches Celery workers, pings them, restarts the dead ones and reports to Slack",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Path to the JSON config file
    #[clap(long, global = true, env = CONFIG_PATH_ENV_VAR)]
    pub config: Option<String>,

    /// Directory for the daily rolling log file; stdout only when unset
    #[clap(long, global = true, env = LOG_DIR_ENV_VAR)]
    pub log_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the monitor loop until interrupted (default)
    Run,

    /// Run a single monitoring iteration and print what it did
    Check,

    /// List the Celery worker processes and their queues
    Workers,

    /// List the systemd units of the workers and their status
    Units,

    /// Ping the worker serving a queue
    Ping {
        /// Queue name as passed to `-Q`
        queue: String,
    },

    /// Send a test message to the alert webhook
    Alert {
        message: String,
    },
}
