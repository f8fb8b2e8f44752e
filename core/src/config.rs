//! Client configuration: API key, base URL and request timeout.

use std::fmt;
use std::time::Duration;

use crate::error::{Result, SquareError};

pub const DEFAULT_BASE_URL: &str = "https://api.squarecloud.app/v1/public";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const API_KEY_ENV: &str = "SQUARECLOUD_API_KEY";
pub const BASE_URL_ENV: &str = "SQUARECLOUD_BASE_URL";
pub const TIMEOUT_ENV: &str = "SQUARECLOUD_TIMEOUT_SECS";

/// The static credential sent in the `Authorization` header.
///
/// `Debug` prints only the first and last four characters.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(SquareError::Config("API key must not be empty".to_string()));
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn masked(&self) -> String {
        let key = &self.0;
        if key.chars().count() <= 8 {
            return "****".to_string();
        }
        let head: String = key.chars().take(4).collect();
        let tail: String = key
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: ApiKey,
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read configuration from `SQUARECLOUD_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(API_KEY_ENV)
            .ok_or_else(|| SquareError::Config(format!("{API_KEY_ENV} is not set")))?;
        let mut config = Self::new(ApiKey::new(key)?);

        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                SquareError::Config(format!("{TIMEOUT_ENV} must be a whole number of seconds, got {raw:?}"))
            })?;
            if secs == 0 {
                return Err(SquareError::Config(format!("{TIMEOUT_ENV} must be positive")));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
