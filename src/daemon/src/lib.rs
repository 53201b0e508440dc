pub mod daemon;
pub mod monitor;

pub use monitor::{IterationReport, Monitor};
