//! Configuration management.
//!
//! Configuration lives in `<config_dir>/titleport/config.json`. Every field is
//! optional; a missing file means defaults. The service endpoint and scope
//! can be overridden from the environment.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use titleport_fetch::{
    DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL, DEFAULT_SERVICE_ENDPOINT, DEFAULT_SERVICE_SCOPE,
    ENDPOINT_ENV_VAR, FetchSettings, RetryPolicy, SCOPE_ENV_VAR,
};
use titleport_fetch::retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
use tracing::{debug, info};

use crate::error::StoreError;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Title service location.
    #[serde(default)]
    pub service: ServiceConfig,
    /// Acquisition polling.
    #[serde(default)]
    pub polling: PollingConfig,
    /// Retry policy for opted-in calls.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Title service location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Discovery endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Token scope for the service.
    #[serde(default = "default_scope")]
    pub scope: String,
}

/// Acquisition polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between status checks.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Maximum number of status checks.
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

/// Retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempt budget, at least 1.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Milliseconds between attempts.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_SERVICE_ENDPOINT.to_string()
}

fn default_scope() -> String {
    DEFAULT_SERVICE_SCOPE.to_string()
}

fn default_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_max_polls() -> u32 {
    DEFAULT_MAX_POLLS.get()
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS.get()
}

fn default_delay_ms() -> u64 {
    u64::try_from(DEFAULT_RETRY_DELAY.as_millis()).unwrap_or(u64::MAX)
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            scope: default_scope(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_polls: default_max_polls(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            polling: PollingConfig::default(),
            retry: RetryConfig::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("titleport")
            .join("config.json")
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`; empty values are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) = value(ENDPOINT_ENV_VAR) {
            debug!(endpoint = %endpoint, "Service endpoint overridden from environment");
            self.service.endpoint = endpoint;
        }
        if let Some(scope) = value(SCOPE_ENV_VAR) {
            debug!(scope = %scope, "Service scope overridden from environment");
            self.service.scope = scope;
        }
    }

    /// Converts the configuration into client settings.
    ///
    /// Zero budgets are rejected here rather than carried into the client.
    pub fn to_settings(&self) -> Result<FetchSettings, StoreError> {
        let max_polls = NonZeroU32::new(self.polling.max_polls)
            .ok_or_else(|| StoreError::Config("polling.max_polls must be at least 1".to_string()))?;
        let max_attempts = NonZeroU32::new(self.retry.max_attempts)
            .ok_or_else(|| StoreError::Config("retry.max_attempts must be at least 1".to_string()))?;
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be at least 1".to_string()));
        }

        let mut settings = FetchSettings::default()
            .with_endpoint(self.service.endpoint.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_polling(Duration::from_secs(self.polling.interval_secs), max_polls)
            .with_retry(
                RetryPolicy::new(max_attempts).with_delay(Duration::from_millis(self.retry.delay_ms)),
            );
        settings.scope.clone_from(&self.service.scope);
        Ok(settings)
    }
}

// ============================================================================
// Tests
// ============================================================================
