//! Client configuration, read from `<home>/.orchid/config.yaml`.
//!
//! Every field has a default, so a missing file (or a file that sets only a
//! few keys) is valid. The client never writes this file.
//!
//! ```yaml
//! catalog_url: https://64b391b20efb99d862680d7a.mockapi.io
//! auth_url: https://identitytoolkit.googleapis.com
//! api_key: <identity provider web key>
//! timeout_secs: 10
//! max_retries: 2
//! retry_backoff_ms: 200
//! ```
//!
//! As with the store, every loader has an `_at(home, …)` form for tests and a
//! convenience form that derives `home` from `dirs::home_dir()`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CATALOG_URL: &str = "https://64b391b20efb99d862680d7a.mockapi.io";
pub const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com";

/// Remote endpoints and transport policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the catalog service; `/orchids` is appended.
    pub catalog_url: String,
    /// Base URL of the identity provider's REST API.
    pub auth_url: String,
    /// Identity provider web API key. Login and register fail without it.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Extra attempts after the first for retryable failures.
    pub max_retries: u32,
    /// First backoff delay; doubled after every retry.
    pub retry_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            api_key: None,
            timeout_secs: 10,
            max_retries: 2,
            retry_backoff_ms: 200,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.catalog_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "catalog_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.auth_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "auth_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}

/// `<home>/.orchid/`
pub fn orchid_root(home: &Path) -> PathBuf {
    home.join(".orchid")
}

/// `<home>/.orchid/config.yaml`. Pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    orchid_root(home).join("config.yaml")
}

/// Load the config under `home`, falling back to defaults when absent.
pub fn load_at(home: &Path) -> Result<Config, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })?;
    config.validate()
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Config, ConfigError> {
    load_at(&home()?)
}

/// The user's home directory.
pub fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}
