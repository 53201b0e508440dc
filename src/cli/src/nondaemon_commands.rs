use std::sync::Arc;

use anyhow::{bail, Result};
use gaia_client::{Alert, AlertLevel, AlertSink, SlackNotifier};
use gaia_common::config::Config;
use gaia_common::utils::command::{CommandRunner, SystemCommandRunner};
use gaia_daemon::Monitor;
use gaia_extracts::liveness::{CeleryPingProber, LivenessProber};
use gaia_extracts::process_watcher::{extract_queue_name, ProcessScanner, SysinfoProcessScanner};
use gaia_extracts::service_manager::{SystemctlUnitLister, UnitLister};

pub async fn check(config: Arc<Config>) -> Result<()> {
    let monitor = Monitor::from_config(config)?;
    let report = monitor.run_once().await;

    println!("Workers seen:       {}", report.workers_seen);
    println!("Pings failed:       {}", report.pings_failed);
    println!("Units seen:         {}", report.units_seen);
    println!("Units not active:   {}", report.units_not_active);
    println!(
        "Restarts:           {} ({} failed)",
        report.restarts_attempted, report.restarts_failed
    );
    println!(
        "Alerts:             {} ({} failed)",
        report.alerts_sent, report.alerts_failed
    );
    Ok(())
}

pub async fn print_workers(config: &Config) -> Result<()> {
    let scanner = SysinfoProcessScanner::new(config.worker_marker.clone());
    let workers = scanner.scan().await;

    if workers.is_empty() {
        println!("No Celery workers found.");
        return Ok(());
    }

    for cmd in workers {
        println!("{:<24}{}", extract_queue_name(&cmd), cmd);
    }
    Ok(())
}

pub async fn print_units(config: &Config) -> Result<()> {
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner);
    let units = SystemctlUnitLister::new(runner, config).list_units().await;

    if units.is_empty() {
        println!("No Celery units found.");
        return Ok(());
    }

    for (unit, status) in units {
        println!("{unit:<48}{status}");
    }
    Ok(())
}

pub async fn ping(config: Arc<Config>, queue: &str) -> Result<()> {
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner);
    let prober = CeleryPingProber::new(runner, config);

    if !prober.ping(queue).await {
        bail!("Worker for queue {queue} did not answer the ping");
    }
    println!("Worker for queue {queue} is alive");
    Ok(())
}

pub async fn send_test_alert(config: &Config, message: String) -> Result<()> {
    let notifier = SlackNotifier::from_config(config)?;
    notifier
        .send(&Alert::new(AlertLevel::Warning, message))
        .await?;
    println!("Alert sent to {}", notifier.endpoint());
    Ok(())
}
