pub mod alert;
pub mod slack;

pub use alert::{Alert, AlertLevel, AlertSink};
pub use slack::SlackNotifier;
