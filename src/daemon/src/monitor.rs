//! The poll-check-act loop.
//!
//! One iteration looks at the process table, pings every worker found there, then looks
//! at the service manager's view of the worker units. Anything dead gets one alert and
//! one restart. Iterations never overlap and nothing carries over between them.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use gaia_client::{
    Alert, AlertSink, RestartTarget, ServiceController, SlackNotifier, SystemctlController,
};
use gaia_common::config::Config;
use gaia_common::constants::ACTIVE_STATUS;
use gaia_common::utils::command::{CommandRunner, SystemCommandRunner};
use gaia_extracts::liveness::{CeleryPingProber, LivenessProber};
use gaia_extracts::process_watcher::{extract_queue_name, ProcessScanner, SysinfoProcessScanner};
use gaia_extracts::service_manager::{SystemctlUnitLister, UnitLister};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What a single iteration saw and did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IterationReport {
    pub workers_seen: usize,
    pub pings_failed: usize,
    pub units_seen: usize,
    pub units_not_active: usize,
    pub restarts_attempted: usize,
    pub restarts_failed: usize,
    pub alerts_sent: usize,
    pub alerts_failed: usize,
}

pub struct Monitor {
    scanner: Arc<dyn ProcessScanner>,
    units: Arc<dyn UnitLister>,
    prober: Arc<dyn LivenessProber>,
    controller: Arc<dyn ServiceController>,
    alerts: Arc<dyn AlertSink>,
    poll_interval: Duration,
}

impl Monitor {
    pub fn new(
        scanner: Arc<dyn ProcessScanner>,
        units: Arc<dyn UnitLister>,
        prober: Arc<dyn LivenessProber>,
        controller: Arc<dyn ServiceController>,
        alerts: Arc<dyn AlertSink>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            scanner,
            units,
            prober,
            controller,
            alerts,
            poll_interval,
        }
    }

    /// Wires the system implementations of every collaborator from `config`.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner);

        Ok(Self::new(
            Arc::new(SysinfoProcessScanner::new(config.worker_marker.clone())),
            Arc::new(SystemctlUnitLister::new(Arc::clone(&runner), &config)),
            Arc::new(CeleryPingProber::new(Arc::clone(&runner), Arc::clone(&config))),
            Arc::new(SystemctlController::new(runner, Arc::clone(&config))),
            Arc::new(SlackNotifier::from_config(&config)?),
            config.poll_interval(),
        ))
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Runs one full iteration. Never fails: every problem is logged and counted.
    #[tracing::instrument(skip(self))]
    pub async fn run_once(&self) -> IterationReport {
        let mut report = IterationReport::default();

        self.check_processes(&mut report).await;
        self.check_units(&mut report).await;

        report
    }

    async fn check_processes(&self, report: &mut IterationReport) {
        let workers = self.scanner.scan().await;
        report.workers_seen = workers.len();

        if workers.is_empty() {
            warn!("No Celery workers found! Check the server.");
            self.alert(Alert::no_workers(), report).await;
            return;
        }

        for worker_cmd in &workers {
            let queue = extract_queue_name(worker_cmd);
            let alive = self.prober.ping(&queue).await;
            debug!("Worker {queue} alive: {alive}");

            if !alive {
                report.pings_failed += 1;
                self.alert(Alert::worker_down(worker_cmd), report).await;
                self.restart(RestartTarget::Queue(queue), report).await;
            }
        }
    }

    async fn check_units(&self, report: &mut IterationReport) {
        let units = self.units.list_units().await;
        report.units_seen = units.len();

        for (unit, status) in &units {
            debug!("systemd worker {unit} status: {status}");
            if status != ACTIVE_STATUS {
                report.units_not_active += 1;
                self.alert(Alert::worker_down(unit), report).await;
                self.restart(RestartTarget::Unit(unit.clone()), report).await;
            }
        }
    }

    async fn alert(&self, alert: Alert, report: &mut IterationReport) {
        report.alerts_sent += 1;
        if let Err(e) = self.alerts.send(&alert).await {
            report.alerts_failed += 1;
            error!("An error occurred while sending alert: {e:#}");
        }
    }

    async fn restart(&self, target: RestartTarget, report: &mut IterationReport) {
        report.restarts_attempted += 1;
        if let Err(e) = self.controller.restart(&target).await {
            report.restarts_failed += 1;
            error!("Error restarting {target}: {e:#}");
        }
    }

    /// Polls until `cancellation_token` fires. Cancellation is observed before each
    /// iteration and during the sleep between iterations; a running iteration completes.
    pub async fn run(&self, cancellation_token: CancellationToken) {
        info!(
            "Starting Celery Worker Monitoring (every {:?})",
            self.poll_interval
        );

        loop {
            if cancellation_token.is_cancelled() {
                break;
            }

            let report = self.run_once().await;
            info!(?report, "Monitoring iteration finished");

            tokio::select! {
                _ = cancellation_token.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        info!("Celery Worker Monitoring stopped");
    }
}
