/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed monitor configuration
[POS]:    Configuration layer - service endpoint and client settings
[UPDATE]: When adding new configuration options
*/

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stock_fetch_adapter::{ClientConfig, DEFAULT_BASE_URL};

use crate::params::DEFAULT_YEARS;
use crate::task::Locale;

/// Top-level configuration for the fetch monitor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Base URL of the fetch service (http or https)
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Language of state labels
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub http: HttpConfig,
    /// Look-back years used when a query gives no `--years`
    #[serde(default = "default_years")]
    pub default_years: u32,
}

/// HTTP client timeouts in seconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            locale: Locale::default(),
            http: HttpConfig::default(),
            default_years: default_years(),
        }
    }
}

fn default_server_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_years() -> u32 {
    DEFAULT_YEARS
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl MonitorConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Load an explicit path, or the default path when it exists
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.http.timeout_secs),
            connect_timeout: Duration::from_secs(self.http.connect_timeout_secs),
        }
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(self).context("failed to serialize config to YAML")
    }
}

/// `<config dir>/stock-fetch/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stock-fetch").join("config.yaml"))
}
