//! Configuration from environment variables.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_USER_AGENT: &str = "Sizzle/1.0";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Runtime configuration shared by the CLI and library callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizzleConfig {
    /// Backend base URL; recipes live under `{base_url}/recipes`.
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Whether the step overlay starts open when a recipe is presented.
    pub start_open: bool,
}

impl Default for SizzleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            start_open: false,
        }
    }
}

impl SizzleConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `SIZZLE_API_BASE_URL`: backend base URL (default: "http://localhost:8000")
    /// - `SIZZLE_HTTP_TIMEOUT_SECS`: request timeout (default: 30)
    /// - `SIZZLE_USER_AGENT`: user agent (default: "Sizzle/1.0")
    /// - `SIZZLE_START_OPEN`: open the step overlay immediately (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url =
            lookup("SIZZLE_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url).map_err(|e| ConfigError::InvalidValue {
            var: "SIZZLE_API_BASE_URL".to_string(),
            reason: e.to_string(),
        })?;

        let timeout_secs = match lookup("SIZZLE_HTTP_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "SIZZLE_HTTP_TIMEOUT_SECS".to_string(),
                reason: format!("expected a whole number of seconds, got '{}'", v),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let user_agent =
            lookup("SIZZLE_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let start_open = lookup("SIZZLE_START_OPEN")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            user_agent,
            start_open,
        })
    }
}
