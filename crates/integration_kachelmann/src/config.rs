//! Forecast service configuration

use serde::{Deserialize, Serialize};

use crate::error::KachelmannError;

/// Path of the location search form below the base URL
const SEARCH_PATH: &str = "/wetter/search";

/// Path of the hourly/daily forecast fragment below the base URL
const FORECAST_PATH: &str = "/ajax_pub/weathernexthoursdays";

/// Configuration for the kachelmannwetter.com integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KachelmannConfig {
    /// Site base URL including the language prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Remember names the service reported as unknown
    #[serde(default = "default_cache_negative_results")]
    pub cache_negative_results: bool,
}

fn default_base_url() -> String {
    "https://kachelmannwetter.com/de".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

const fn default_cache_negative_results() -> bool {
    true
}

impl Default for KachelmannConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            cache_negative_results: default_cache_negative_results(),
        }
    }
}

impl KachelmannConfig {
    /// Create a configuration for testing against a local mock server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 5,
            connect_timeout_secs: 2,
            ..Default::default()
        }
    }

    /// URL of the location search form
    #[must_use]
    pub fn search_url(&self) -> String {
        format!("{}{SEARCH_PATH}", self.base_url.trim_end_matches('/'))
    }

    /// URL of the forecast fragment endpoint
    #[must_use]
    pub fn forecast_url(&self) -> String {
        format!("{}{FORECAST_PATH}", self.base_url.trim_end_matches('/'))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), KachelmannError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(KachelmannError::Configuration(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(KachelmannError::Configuration(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.connect_timeout_secs == 0 {
            return Err(KachelmannError::Configuration(
                "connect_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
