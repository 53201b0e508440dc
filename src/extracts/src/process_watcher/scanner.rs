use std::ffi::OsStr;
use std::sync::Arc;

use async_trait::async_trait;
use gaia_common::utils::env::expected_service_name;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tokio::sync::Mutex;
use tracing::{debug, error};

/// Source of worker command lines, refreshed on every call.
#[async_trait]
pub trait ProcessScanner: Send + Sync {
    async fn scan(&self) -> Vec<String>;
}

/// Scans the OS process table for command lines containing a marker substring.
pub struct SysinfoProcessScanner {
    system: Arc<Mutex<System>>,
    marker: String,
}

impl SysinfoProcessScanner {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            system: Arc::new(Mutex::new(System::new())),
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

#[async_trait]
impl ProcessScanner for SysinfoProcessScanner {
    #[tracing::instrument(skip(self), fields(marker = %self.marker))]
    async fn scan(&self) -> Vec<String> {
        debug!("Expected service name: {:?}", expected_service_name());

        let system = Arc::clone(&self.system);
        let marker = self.marker.clone();
        let own_pid = std::process::id();

        // refreshing the whole process table reads /proc and may block
        let scanned = tokio::task::spawn_blocking(move || {
            let mut sys = system.blocking_lock();
            sys.refresh_processes_specifics(
                ProcessesToUpdate::All,
                true,
                ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
            );

            let candidates = sys
                .processes()
                .iter()
                .filter(|(_, process)| process.thread_kind().is_none())
                .map(|(pid, process)| (*pid, join_command_line(process.cmd())));

            filter_worker_command_lines(candidates, &marker, Pid::from_u32(own_pid))
        })
        .await;

        match scanned {
            Ok(workers) => {
                for worker in &workers {
                    debug!("Worker command: {worker}");
                }
                workers
            }
            Err(e) => {
                error!("Process scan task failed: {e}");
                vec![]
            }
        }
    }
}

pub fn join_command_line<S: AsRef<OsStr>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| arg.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keeps non-empty command lines containing `marker`, excluding `own_pid`, ordered by PID.
pub fn filter_worker_command_lines<I>(candidates: I, marker: &str, own_pid: Pid) -> Vec<String>
where
    I: IntoIterator<Item = (Pid, String)>,
{
    let mut matches: Vec<(Pid, String)> = candidates
        .into_iter()
        .filter(|(pid, command_line)| {
            *pid != own_pid && !command_line.is_empty() && command_line.contains(marker)
        })
        .collect();

    matches.sort_by_key(|(pid, _)| *pid);
    matches.into_iter().map(|(_, command_line)| command_line).collect()
}
