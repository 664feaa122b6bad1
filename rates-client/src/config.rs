//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use rates_types::Credential;

pub const BASE_URL_VAR: &str = "EXCHANGE_RATE_API_URL";
pub const API_KEY_VAR: &str = "EXCHANGE_RATE_API_KEY";
pub const TIMEOUT_VAR: &str = "EXCHANGE_RATE_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub credential: Credential,
    pub timeout: Duration,
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, credential: impl Into<Credential>) -> Self {
        Self {
            base_url: base_url.into(),
            credential: credential.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing(API_KEY_VAR))?;

        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: TIMEOUT_VAR,
                value,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self::new(base_url, api_key).with_timeout(Duration::from_secs(timeout_secs)))
    }
}
