use std::sync::LazyLock;

use gaia_common::constants::DEFAULT_QUEUE_NAME;
use regex::Regex;

/// `-Q name`, `-Qname`, `--queues name` or `--queues=name`. Only the first queue of a
/// comma-separated list is captured.
static QUEUE_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:-Q\s*|--queues(?:=|\s+))(\w[\w.\-]*)")
        .expect("queue flag pattern is valid")
});

/// Queue name a worker was started with, or `"celery"` when it was started without one.
pub fn extract_queue_name(command_line: &str) -> String {
    QUEUE_FLAG
        .captures(command_line)
        .and_then(|captures| captures.get(1))
        .map(|queue| queue.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_QUEUE_NAME.to_string())
}
