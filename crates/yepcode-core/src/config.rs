//! Executor configuration
//!
//! `ExecutorConfig` is the user-facing, partially specified form: every field
//! has a default and the token may be left out. `resolve` validates it and
//! fills the gaps from the process environment, producing the immutable
//! `ResolvedConfig` the executor and the HTTP runner are built from.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::errors::ExecutorError;

pub const API_TOKEN_ENV: &str = "YEPCODE_API_TOKEN";
pub const API_HOST_ENV: &str = "YEPCODE_API_HOST";

fn default_timeout() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// YepCode API token. Falls back to `YEPCODE_API_TOKEN` when unset.
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,
    /// Timeout in seconds, forwarded to the service.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Remove the execution on the service once it is done.
    #[serde(default)]
    pub remove_on_done: bool,
    /// Wait for every execution to finish before moving on.
    #[serde(default = "default_true")]
    pub sync_execution: bool,
    #[serde(default)]
    pub api_host: Option<String>,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            timeout: default_timeout(),
            remove_on_done: false,
            sync_execution: default_true(),
            api_host: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl ExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn remove_on_done(mut self, remove: bool) -> Self {
        self.remove_on_done = remove;
        self
    }

    pub fn sync_execution(mut self, sync: bool) -> Self {
        self.sync_execution = sync;
        self
    }

    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    pub fn poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }

    /// Validates the settings and resolves the token and host.
    ///
    /// Precedence for both is: explicit value, then environment variable.
    /// A missing token is an error. A missing host is left unset; runners that
    /// need one (`HttpRunner`) reject it when they are built.
    pub fn resolve(&self) -> Result<ResolvedConfig, ExecutorError> {
        if self.timeout < 1 {
            return Err(ExecutorError::ConfigError(
                "Timeout must be greater than or equal to 1.".to_string(),
            ));
        }
        if self.poll_interval_ms < 1 {
            return Err(ExecutorError::ConfigError(
                "Poll interval must be greater than or equal to 1 millisecond.".to_string(),
            ));
        }

        let api_token = non_empty(self.api_token.clone())
            .or_else(|| non_empty(env::var(API_TOKEN_ENV).ok()))
            .ok_or_else(|| {
                ExecutorError::ConfigError(format!(
                    "YepCode API token is required. Provide it via api_token parameter or {} environment variable.",
                    API_TOKEN_ENV
                ))
            })?;

        let api_host = non_empty(self.api_host.clone())
            .or_else(|| non_empty(env::var(API_HOST_ENV).ok()))
            .map(|host| host.trim_end_matches('/').to_string());

        Ok(ResolvedConfig {
            api_token,
            api_host,
            timeout_seconds: self.timeout,
            remove_on_done: self.remove_on_done,
            sync_execution: self.sync_execution,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validated configuration. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    api_token: String,
    api_host: Option<String>,
    timeout_seconds: u64,
    remove_on_done: bool,
    sync_execution: bool,
    poll_interval: Duration,
}

impl ResolvedConfig {
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn api_host(&self) -> Option<&str> {
        self.api_host.as_deref()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// Timeout as sent to the service.
    pub fn timeout_millis(&self) -> u64 {
        self.timeout_seconds.saturating_mul(1000)
    }

    pub fn remove_on_done(&self) -> bool {
        self.remove_on_done
    }

    pub fn sync_execution(&self) -> bool {
        self.sync_execution
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

// The token must never end up in logs.
impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("api_token", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("remove_on_done", &self.remove_on_done)
            .field("sync_execution", &self.sync_execution)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load executor settings from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ExecutorConfig, ExecutorError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ExecutorError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<ExecutorConfig, ExecutorError> {
        if content.trim().is_empty() {
            return Ok(ExecutorConfig::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| ExecutorError::ConfigError(format!("Failed to parse YAML config: {}", e)))
    }

    /// Load the file if it exists, otherwise return the defaults.
    pub fn from_optional_file<P: AsRef<Path>>(path: P) -> Result<ExecutorConfig, ExecutorError> {
        if path.as_ref().exists() {
            log::debug!("Loading config from {}", path.as_ref().display());
            Self::from_file(path)
        } else {
            Ok(ExecutorConfig::default())
        }
    }

    /// Load environment variables from a .env file.
    ///
    /// Variables already present in the process environment win. A missing
    /// file is not an error; returns whether anything was loaded.
    pub fn load_env_file<P: AsRef<Path>>(path: P) -> Result<bool, ExecutorError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(false);
        }
        dotenvy::from_path(path).map_err(|e| {
            ExecutorError::ConfigError(format!(
                "Failed to read env file {}: {}",
                path.display(),
                e
            ))
        })?;
        log::debug!("Loaded environment from {}", path.display());
        Ok(true)
    }
}
