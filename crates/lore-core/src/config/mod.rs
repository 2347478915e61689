//! Client configuration for the remote story API.

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Default public story API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://story-api.dicoding.dev/v1";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "LORE_API_URL";

/// Validated base URL for the remote story service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Build a config from an explicit base URL.
    ///
    /// The URL is trimmed, must carry an http(s) scheme, and loses any
    /// trailing slash.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_text_option(Some(base_url.into()))
            .ok_or_else(|| Error::Validation("API base URL must not be empty".to_string()))?;
        if !is_http_url(&base_url) {
            return Err(Error::Validation(
                "API base URL must include http:// or https://".to_string(),
            ));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve the config from `LORE_API_URL`, falling back to the default
    /// public endpoint
    pub fn from_env() -> Result<Self> {
        match normalize_text_option(std::env::var(API_URL_ENV).ok()) {
            Some(url) => Self::new(url),
            None => Self::new(DEFAULT_API_BASE_URL),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a path onto the base URL
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}
