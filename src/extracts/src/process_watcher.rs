pub mod queue_name;
pub mod scanner;

pub use queue_name::extract_queue_name;
pub use scanner::{ProcessScanner, SysinfoProcessScanner};
