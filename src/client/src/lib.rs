pub mod exporters;
pub mod service_control;

pub use exporters::{Alert, AlertLevel, AlertSink, SlackNotifier};
pub use service_control::{RestartTarget, ServiceController, SystemctlController};
