//! Client configuration.
//!
//! [`ClientConfig`] carries everything environment-specific: backend
//! URLs, collection names, and timing knobs. Every field has a default
//! so a config file only needs to list overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SynclineError};

/// Configuration for a syncline [`Client`](crate::client::Client).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the billing/content API.
    pub api_base_url: String,

    /// Base URL the app is served from, used to build checkout
    /// success/cancel return URLs.
    pub app_base_url: String,

    /// Collection holding per-user progress documents.
    pub progress_collection: String,

    /// Collection holding per-user subscription documents.
    pub subscriptions_collection: String,

    /// Change-feed poll interval in milliseconds (HTTP backend only).
    pub poll_interval_ms: u64,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            app_base_url: "http://localhost:3000".to_string(),
            progress_collection: "userProgress".to_string(),
            subscriptions_collection: "subscriptions".to_string(),
            poll_interval_ms: 2000,
            request_timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Default config file location under the platform config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("syncline").join("config.yml"))
    }

    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| SynclineError::ConfigParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check for values that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.progress_collection.is_empty() || self.subscriptions_collection.is_empty() {
            return Err(SynclineError::ConfigValidationError {
                message: "collection names must not be empty".to_string(),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(SynclineError::ConfigValidationError {
                message: "poll_interval_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Change-feed poll interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
