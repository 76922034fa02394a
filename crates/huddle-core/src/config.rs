//! Client configuration.
//!
//! This module holds the handful of knobs the API client needs: the backend
//! base URL and the per-request timeout. Values come from the environment
//! when present, with defaults suitable for local development.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default backend base URL for local development.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Request timeout in seconds.
/// The backend answers well under a second; 5s fails fast enough for the UI
/// to surface a retryable error instead of hanging.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Environment variable overriding the backend base URL.
const ENV_BASE_URL: &str = "HUDDLE_API_BASE_URL";

/// Environment variable overriding the request timeout, in seconds.
const ENV_TIMEOUT_SECS: &str = "HUDDLE_API_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Config pointing at the given backend, keeping the default timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load the config from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Ok(secs) = std::env::var(ENV_TIMEOUT_SECS) {
            config.timeout_secs = secs
                .parse()
                .with_context(|| format!("Invalid {} value: {}", ENV_TIMEOUT_SECS, secs))?;
        }
        Ok(config)
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_with_base_url_keeps_default_timeout() {
        let config = ClientConfig::with_base_url("https://api.example.com");
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
