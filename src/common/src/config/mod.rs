mod config_loader;
mod tests;

pub use config_loader::{Config, ConfigLoader, Setup};
