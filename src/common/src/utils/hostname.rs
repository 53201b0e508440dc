use std::time::Duration;

use sysinfo::System;
use tracing::warn;

use crate::constants::HOSTNAME;
use crate::utils::command::{CommandRunner, CommandSpec};

/// Local machine hostname, from the `hostname` tool or, failing that, from the OS.
pub async fn resolve_hostname(runner: &dyn CommandRunner, timeout: Duration) -> Option<String> {
    match runner.run(&CommandSpec::new(HOSTNAME, timeout)).await {
        Ok(output) => {
            let hostname = output.stdout.trim();
            if !hostname.is_empty() {
                return Some(hostname.to_string());
            }
            warn!("`{HOSTNAME}` returned an empty name");
        }
        Err(e) => warn!("Error resolving hostname: {e}"),
    }

    System::host_name().filter(|name| !name.is_empty())
}
