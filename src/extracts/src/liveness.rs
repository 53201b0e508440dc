pub mod celery_ping;

use async_trait::async_trait;

pub use celery_ping::CeleryPingProber;

/// Application-level liveness check, distinct from "the process exists".
#[async_trait]
pub trait LivenessProber: Send + Sync {
    /// `true` only when the worker answered. Errors and timeouts count as dead.
    async fn ping(&self, queue: &str) -> bool;
}
