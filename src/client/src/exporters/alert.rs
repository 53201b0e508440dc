use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertLevel {
    Critical,
    Warning,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::Critical => write!(f, "critical"),
            AlertLevel::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    pub fn new(level: AlertLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn no_workers() -> Self {
        Self::new(
            AlertLevel::Critical,
            "🚨 No Celery workers are running! Immediate attention required.",
        )
    }

    pub fn worker_down(worker: &str) -> Self {
        Self::new(
            AlertLevel::Warning,
            format!("⚠️ Celery Worker **{worker}** is down! Restarting now..."),
        )
    }
}

/// Delivery of an alert to whoever is on call. Failures are reported, never retried.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn send(&self, alert: &Alert) -> Result<()>;
}
