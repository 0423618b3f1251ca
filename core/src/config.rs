//! Client configuration.
//!
//! A `ClientConfig` is built once and never mutated; every request issued by
//! a client reads from the same immutable copy.

use std::fmt;

use crate::error::{Result, YourFormError};

pub const DEFAULT_BASE_URL: &str = "https://www.yourform.live/api/v1";
pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const ENV_API_KEY: &str = "YOURFORM_API_KEY";
pub const ENV_BASE_URL: &str = "YOURFORM_BASE_URL";
pub const ENV_MAX_RETRIES: &str = "YOURFORM_MAX_RETRIES";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl ClientConfig {
    /// Config with the production base URL and the default retry budget.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(YourFormError::generic("API key must not be empty"));
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Trailing slashes are stripped so paths can be appended verbatim.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Number of retries after the initial attempt. `0` disables retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Read `YOURFORM_API_KEY`, `YOURFORM_BASE_URL` and `YOURFORM_MAX_RETRIES`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(ENV_API_KEY)
            .ok_or_else(|| YourFormError::generic(format!("{ENV_API_KEY} is not set")))?;
        let mut config = Self::new(api_key)?;

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&base_url);
        }
        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            let max_retries = raw.trim().parse::<u32>().map_err(|_| {
                YourFormError::generic(format!("{ENV_MAX_RETRIES} must be a non-negative integer, got {raw:?}"))
            })?;
            config = config.with_max_retries(max_retries);
        }
        Ok(config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
