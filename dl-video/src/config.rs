//! Bootstrap configuration for dl-video
//!
//! ```toml
//! heygen_base_url = "https://api.heygen.com/v2"
//! poll_interval_secs = 30
//! timeout_secs = 600
//! batch_delay_secs = 5
//!
//! [avatars]
//! ken_avatar_id = "..."
//! ken_voice_id = "..."
//!
//! [storage]
//! bucket = "dailylesson-media"
//! custom_domain = "media.mynextlesson.com"
//! ```
//!
//! `HEYGEN_API_KEY` and the avatar/storage environment variables win over
//! file values.

use crate::avatar::AvatarCatalog;
use crate::heygen::DEFAULT_BASE_URL;
use crate::processor::ProcessorSettings;
use dl_common::config::{env_or, LoggingConfig, StorageConfig};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const MODULE_NAME: &str = "dl-video";

#[derive(Debug, Clone, Deserialize)]
pub struct VideoConfig {
    #[serde(default = "default_base_url")]
    pub heygen_base_url: String,

    /// `HEYGEN_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_batch_delay_secs")]
    pub batch_delay_secs: u64,

    /// Per-request HTTP timeout, seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub avatars: AvatarCatalog,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            heygen_base_url: default_base_url(),
            api_key: None,
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_timeout_secs(),
            batch_delay_secs: default_batch_delay_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            data_dir: None,
            avatars: AvatarCatalog::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl VideoConfig {
    /// Overlay secrets and identifiers from the environment
    pub fn with_env_overrides(self) -> Self {
        Self {
            api_key: env_or("HEYGEN_API_KEY", self.api_key),
            avatars: self.avatars.with_env_overrides(),
            storage: self.storage.with_env_overrides(),
            ..self
        }
    }

    pub fn processor_settings(&self) -> ProcessorSettings {
        ProcessorSettings {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            batch_delay: Duration::from_secs(self.batch_delay_secs),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_batch_delay_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    60
}
