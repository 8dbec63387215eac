//! CLI settings
//!
//! Layered from lowest to highest precedence: built-in defaults, an optional
//! TOML file, `KACHELMANN_*` environment variables and command-line flags.

use std::path::Path;

use integration_kachelmann::KachelmannConfig;
use serde::Deserialize;

/// Name of the settings file looked up in the working directory
const DEFAULT_FILE: &str = "kachelmann";

/// Resolved CLI settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Site base URL including the language prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Remember names the site reported as unknown
    pub cache_negative_results: bool,
    /// User-Agent to send instead of, or in front of, the default one
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Send `user_agent` on its own
    #[serde(default)]
    pub replace_user_agent: bool,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub replace_user_agent: bool,
    pub no_negative_cache: bool,
}

impl Settings {
    /// Load settings from all sources
    ///
    /// Without `file` a `kachelmann.toml` in the working directory is used
    /// if present.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self, config::ConfigError> {
        let defaults = KachelmannConfig::default();

        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_FILE).required(false),
        };

        let mut builder = config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .set_default("connect_timeout_secs", defaults.connect_timeout_secs)?
            .set_default("cache_negative_results", defaults.cache_negative_results)?
            .add_source(file_source)
            // e.g. KACHELMANN_BASE_URL, KACHELMANN_TIMEOUT_SECS
            .add_source(
                config::Environment::with_prefix("KACHELMANN")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .set_override_option("base_url", overrides.base_url.clone())?
            .set_override_option("user_agent", overrides.user_agent.clone())?;

        if overrides.replace_user_agent {
            builder = builder.set_override("replace_user_agent", true)?;
        }
        if overrides.no_negative_cache {
            builder = builder.set_override("cache_negative_results", false)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Configuration for the forecast client
    pub fn kachelmann_config(&self) -> KachelmannConfig {
        KachelmannConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            connect_timeout_secs: self.connect_timeout_secs,
            cache_negative_results: self.cache_negative_results,
        }
    }
}
