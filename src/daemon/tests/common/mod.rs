#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use gaia_client::{Alert, AlertSink, RestartTarget, ServiceController};
use gaia_daemon::Monitor;
use gaia_extracts::liveness::LivenessProber;
use gaia_extracts::process_watcher::ProcessScanner;
use gaia_extracts::service_manager::UnitLister;

#[derive(Default)]
pub struct FakeScanner {
    pub workers: Vec<String>,
    pub calls: AtomicUsize,
}

impl FakeScanner {
    pub fn with(workers: &[&str]) -> Self {
        Self {
            workers: workers.iter().map(|w| w.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessScanner for FakeScanner {
    async fn scan(&self) -> Vec<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.workers.clone()
    }
}

#[derive(Default)]
pub struct FakeUnits {
    pub units: BTreeMap<String, String>,
}

impl FakeUnits {
    pub fn with(units: &[(&str, &str)]) -> Self {
        Self {
            units: units
                .iter()
                .map(|(unit, status)| (unit.to_string(), status.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl UnitLister for FakeUnits {
    async fn list_units(&self) -> BTreeMap<String, String> {
        self.units.clone()
    }
}

/// Every queue is alive unless listed in `dead`.
#[derive(Default)]
pub struct FakeProber {
    pub dead: HashSet<String>,
    pub pinged: Mutex<Vec<String>>,
}

impl FakeProber {
    pub fn dead(queues: &[&str]) -> Self {
        Self {
            dead: queues.iter().map(|q| q.to_string()).collect(),
            pinged: Mutex::new(vec![]),
        }
    }

    pub fn pinged(&self) -> Vec<String> {
        self.pinged.lock().unwrap().clone()
    }
}

#[async_trait]
impl LivenessProber for FakeProber {
    async fn ping(&self, queue: &str) -> bool {
        self.pinged.lock().unwrap().push(queue.to_string());
        !self.dead.contains(queue)
    }
}

#[derive(Default)]
pub struct RecordingController {
    pub fail: bool,
    pub restarted: Mutex<Vec<RestartTarget>>,
}

impl RecordingController {
    pub fn restarted(&self) -> Vec<RestartTarget> {
        self.restarted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceController for RecordingController {
    async fn restart(&self, target: &RestartTarget) -> Result<()> {
        self.restarted.lock().unwrap().push(target.clone());
        if self.fail {
            bail!("restart of {target} failed");
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub fail: bool,
    pub alerts: Mutex<Vec<Alert>>,
}

impl RecordingSink {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn send(&self, alert: &Alert) -> Result<()> {
        self.alerts.lock().unwrap().push(alert.clone());
        if self.fail {
            bail!("webhook unreachable");
        }
        Ok(())
    }
}

pub struct Harness {
    pub scanner: Arc<FakeScanner>,
    pub units: Arc<FakeUnits>,
    pub prober: Arc<FakeProber>,
    pub controller: Arc<RecordingController>,
    pub sink: Arc<RecordingSink>,
}

impl Harness {
    pub fn new(scanner: FakeScanner, units: FakeUnits, prober: FakeProber) -> Self {
        Self {
            scanner: Arc::new(scanner),
            units: Arc::new(units),
            prober: Arc::new(prober),
            controller: Arc::new(RecordingController::default()),
            sink: Arc::new(RecordingSink::default()),
        }
    }

    pub fn monitor(&self, poll_interval: Duration) -> Monitor {
        Monitor::new(
            self.scanner.clone(),
            self.units.clone(),
            self.prober.clone(),
            self.controller.clone(),
            self.sink.clone(),
            poll_interval,
        )
    }
}
