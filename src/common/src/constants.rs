pub const DEFAULT_CONFIG_FILE: &str = "celery_service_name.json";
pub const CONFIG_PATH_ENV_VAR: &str = "GAIA_CONFIG";
pub const WEBHOOK_URL_ENV_VAR: &str = "GAIA_SLACK_WEBHOOK_URL";
pub const LOG_DIR_ENV_VAR: &str = "GAIA_LOG_DIR";

/// Read on every process scan and logged; it does not gate any check.
pub const EXPECTED_SERVICE_ENV_VAR: &str = "celery";

pub const SETUP_KEY: &str = "setup";
pub const DEFAULT_WEBHOOK_URL: &str = "Somewebhook";

/// Queue name used when a worker was started without `-Q`.
pub const DEFAULT_QUEUE_NAME: &str = "celery";
pub const DEFAULT_WORKER_MARKER: &str = "celery";
pub const DEFAULT_CELERY_APP_SUFFIX: &str = "celery";
pub const DEFAULT_VENV_PYTHON: &str = "venv/bin/python3";

pub const POLL_INTERVAL_SECS: u64 = 20;
pub const PING_TIMEOUT_SECS: u64 = 30;
pub const COMMAND_TIMEOUT_SECS: u64 = 30;
pub const WEBHOOK_TIMEOUT_SECS: u64 = 10;

pub const SYSTEMCTL: &str = "systemctl";
pub const HOSTNAME: &str = "hostname";
pub const ACTIVE_STATUS: &str = "active";
