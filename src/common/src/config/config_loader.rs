use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config as RConfig, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{
    COMMAND_TIMEOUT_SECS, CONFIG_PATH_ENV_VAR, DEFAULT_CELERY_APP_SUFFIX, DEFAULT_CONFIG_FILE,
    DEFAULT_VENV_PYTHON, DEFAULT_WEBHOOK_URL, DEFAULT_WORKER_MARKER, PING_TIMEOUT_SECS,
    POLL_INTERVAL_SECS, SETUP_KEY, WEBHOOK_TIMEOUT_SECS, WEBHOOK_URL_ENV_VAR,
};

/// The `setup` object of the config file, as written by the operator.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Setup {
    #[serde(default = "default_webhook_url")]
    pub slack_webhook_url: String,
    #[serde(default)]
    pub project_wd: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_ping_timeout_secs")]
    pub ping_timeout_secs: u64,
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    #[serde(default = "default_webhook_timeout_secs")]
    pub webhook_timeout_secs: u64,

    #[serde(default = "default_worker_marker")]
    pub worker_marker: String,
    #[serde(default)]
    pub python_bin: Option<String>,
    #[serde(default = "default_celery_app_suffix")]
    pub celery_app_suffix: String,
}

fn default_webhook_url() -> String {
    DEFAULT_WEBHOOK_URL.to_string()
}

fn default_poll_interval_secs() -> u64 {
    POLL_INTERVAL_SECS
}

fn default_ping_timeout_secs() -> u64 {
    PING_TIMEOUT_SECS
}

fn default_command_timeout_secs() -> u64 {
    COMMAND_TIMEOUT_SECS
}

fn default_webhook_timeout_secs() -> u64 {
    WEBHOOK_TIMEOUT_SECS
}

fn default_worker_marker() -> String {
    DEFAULT_WORKER_MARKER.to_string()
}

fn default_celery_app_suffix() -> String {
    DEFAULT_CELERY_APP_SUFFIX.to_string()
}

/// Validated, read-only configuration shared by every component.
#[derive(Clone, Debug)]
pub struct Config {
    pub slack_webhook_url: String,
    pub project_wd: PathBuf,
    pub project_name: String,
    pub python_bin: PathBuf,
    pub celery_app_suffix: String,
    pub worker_marker: String,

    pub poll_interval_secs: u64,
    pub ping_timeout_secs: u64,
    pub command_timeout_secs: u64,
    pub webhook_timeout_secs: u64,

    /// Logical worker name -> service-manager unit name.
    pub units: BTreeMap<String, String>,

    pub config_source: PathBuf,
}

impl Config {
    /// Config with every tunable at its default and no unit mappings.
    pub fn new(project_wd: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        let project_wd = project_wd.into();
        Self {
            slack_webhook_url: default_webhook_url(),
            python_bin: project_wd.join(DEFAULT_VENV_PYTHON),
            project_wd,
            project_name: project_name.into(),
            celery_app_suffix: default_celery_app_suffix(),
            worker_marker: default_worker_marker(),
            poll_interval_secs: POLL_INTERVAL_SECS,
            ping_timeout_secs: PING_TIMEOUT_SECS,
            command_timeout_secs: COMMAND_TIMEOUT_SECS,
            webhook_timeout_secs: WEBHOOK_TIMEOUT_SECS,
            units: BTreeMap::new(),
            config_source: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    pub fn with_unit(mut self, queue: impl Into<String>, unit: impl Into<String>) -> Self {
        self.units.insert(queue.into(), unit.into());
        self
    }

    pub fn unit_for_queue(&self, queue: &str) -> Option<&str> {
        self.units.get(queue).map(String::as_str)
    }

    /// Value passed to `celery -A`.
    pub fn celery_app(&self) -> String {
        format!("{}.{}", self.project_name, self.celery_app_suffix)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolves the config path from the explicit argument, then `GAIA_CONFIG`, then the
    /// default file name in the working directory.
    pub fn resolve_path(path: Option<&str>) -> PathBuf {
        path.map(PathBuf::from)
            .or_else(|| std::env::var(CONFIG_PATH_ENV_VAR).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn load_config(path: Option<&str>) -> Result<Config> {
        Self::load_config_at(Self::resolve_path(path))
    }

    pub fn load_config_at<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();

        if !path.is_file() {
            bail!("Config file {path:?} not found, please create one and proceed!");
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path:?}"))?;

        let raw = RConfig::builder()
            .add_source(File::from_str(&contents, FileFormat::Json).required(true))
            .build()
            .with_context(|| format!("failed to parse config file {path:?}"))?;

        let mut setup: Setup = raw.get(SETUP_KEY).with_context(|| {
            format!("The `{SETUP_KEY}` key is missing or invalid in {path:?}, please add it and proceed!")
        })?;

        if let Ok(webhook_url) = std::env::var(WEBHOOK_URL_ENV_VAR) {
            setup.slack_webhook_url = webhook_url;
        }

        // worker names are kept verbatim; the layered config splits keys on `.`
        let document: serde_json::Value =
            serde_json::from_str(&contents).context("failed to parse config file")?;
        let units = Self::collect_units(&document);

        let config = Self::validate(setup, units, path)?;
        debug!("Loaded config from {:?}: {:?}", path, config);

        Ok(config)
    }

    fn collect_units(document: &serde_json::Value) -> BTreeMap<String, String> {
        let Some(entries) = document.as_object() else {
            return BTreeMap::new();
        };

        entries
            .iter()
            .filter(|(key, _)| key.as_str() != SETUP_KEY)
            .filter_map(|(key, value)| match value.as_str() {
                Some(unit) => Some((key.clone(), unit.to_string())),
                None => {
                    warn!("Ignoring config key `{key}`: expected a unit name string");
                    None
                }
            })
            .collect()
    }

    fn validate(setup: Setup, units: BTreeMap<String, String>, path: &Path) -> Result<Config> {
        let project_wd = match setup.project_wd.as_deref().map(str::trim) {
            Some(wd) if !wd.is_empty() => PathBuf::from(wd),
            _ => bail!(
                "The project_wd key is missing in the config file, please add it and proceed!"
            ),
        };

        let project_name = match setup.project_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => bail!(
                "The project_name key is missing in the config file, please add it and proceed!"
            ),
        };

        if setup.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be greater than zero");
        }
        if setup.ping_timeout_secs == 0
            || setup.command_timeout_secs == 0
            || setup.webhook_timeout_secs == 0
        {
            bail!(
                "ping_timeout_secs, command_timeout_secs and webhook_timeout_secs must be greater than zero"
            );
        }

        let python_bin = setup
            .python_bin
            .map(PathBuf::from)
            .unwrap_or_else(|| project_wd.join(DEFAULT_VENV_PYTHON));

        Ok(Config {
            slack_webhook_url: setup.slack_webhook_url,
            project_wd,
            project_name,
            python_bin,
            celery_app_suffix: setup.celery_app_suffix,
            worker_marker: setup.worker_marker,
            poll_interval_secs: setup.poll_interval_secs,
            ping_timeout_secs: setup.ping_timeout_secs,
            command_timeout_secs: setup.command_timeout_secs,
            webhook_timeout_secs: setup.webhook_timeout_secs,
            units,
            config_source: path.to_path_buf(),
        })
    }
}
