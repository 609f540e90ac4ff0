use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::error::ReportError;

pub const ROSTER_URL_VAR: &str = "ROSTER_URL";
pub const WEBHOOK_URL_VAR: &str = "PUBLISH_WEBHOOK_URL";
pub const MESSAGE_IDS_VAR: &str = "PUBLISH_MESSAGE_IDS";
pub const SECRET_VAR: &str = "SHARED_SECRET";

/// Environment override for the service config file path
pub const CONFIG_PATH_VAR: &str = "ROSTER_STATUS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Process-level settings, read once at startup from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Minutes between scheduled publishes; 0 leaves publishing trigger-only
    #[serde(default)]
    pub schedule_interval_minutes: u64,

    /// Publish once as soon as the scheduler starts
    #[serde(default)]
    pub publish_on_startup: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            schedule_interval_minutes: 0,
            publish_on_startup: false,
        }
    }
}

impl ServiceConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ServiceConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load from the configured path, falling back to defaults when the file is absent.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if Path::new(&path).exists() {
            Self::from_file(&path)
        } else {
            // Logging is not initialised yet at this point
            eprintln!("Config file {} not found, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Lookup used to read report settings, normally backed by the process environment.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub fn process_env() -> EnvLookup {
    Arc::new(|key: &str| std::env::var(key).ok())
}

/// Per-invocation report settings. Built fresh for every run and passed down by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub roster_url: String,
    pub publish_base_url: String,
    /// Target messages, in publishing order
    pub message_ids: Vec<String>,
    pub secret: Option<String>,
}

impl ReportConfig {
    /// Read every field through `lookup`. Missing values come back empty; see [`ReportConfig::validate`].
    pub fn load(lookup: &(dyn Fn(&str) -> Option<String> + Send + Sync)) -> Self {
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        Self {
            roster_url: text(ROSTER_URL_VAR),
            publish_base_url: text(WEBHOOK_URL_VAR),
            message_ids: text(MESSAGE_IDS_VAR)
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            secret: lookup(SECRET_VAR),
        }
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        if self.roster_url.is_empty() {
            return Err(ReportError::MissingConfig(ROSTER_URL_VAR));
        }
        if self.publish_base_url.is_empty() {
            return Err(ReportError::MissingConfig(WEBHOOK_URL_VAR));
        }
        if self.message_ids.is_empty() {
            return Err(ReportError::MissingConfig(MESSAGE_IDS_VAR));
        }
        Ok(())
    }
}
