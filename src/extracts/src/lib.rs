pub mod liveness;
pub mod process_watcher;
pub mod service_manager;
