use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use validator::Validate;

const DEFAULT_GEOLOCATION_TIMEOUT_SECS: u64 = 8;
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;
const DEFAULT_PAGE_SIZE: u64 = 20;
const CONFIG_FILE: &str = "config/core";
const ENV_PREFIX: &str = "AGROLINK";

/// Tunables for the coordination core. Loaded from an optional config file
/// overlaid with `AGROLINK_*` environment variables; everything has a
/// sensible default so zero-config startup works.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    /// Bounded wait for a live device position before route building falls
    /// back to stored endpoints.
    #[serde(default = "default_geolocation_timeout_secs")]
    #[validate(range(min = 1, max = 120))]
    pub geolocation_timeout_secs: u64,

    /// Buffer size of the core event channel.
    #[serde(default = "default_event_channel_capacity")]
    #[validate(range(min = 1))]
    pub event_channel_capacity: usize,

    /// Default page size suggested to list screens.
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 200))]
    pub default_page_size: u64,
}

fn default_geolocation_timeout_secs() -> u64 {
    DEFAULT_GEOLOCATION_TIMEOUT_SECS
}

fn default_event_channel_capacity() -> usize {
    DEFAULT_EVENT_CHANNEL_CAPACITY
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            geolocation_timeout_secs: DEFAULT_GEOLOCATION_TIMEOUT_SECS,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CoreConfig {
    /// Load configuration: defaults, then the optional `config/core` file,
    /// then `AGROLINK_*` environment variables.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let cfg = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let config: CoreConfig = cfg.try_deserialize()?;
        config.validate()?;
        info!(
            geolocation_timeout_secs = config.geolocation_timeout_secs,
            "core configuration loaded"
        );
        Ok(config)
    }

    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_secs(self.geolocation_timeout_secs)
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read configuration: {0}")]
    Read(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
