//! Bootstrap configuration for dl-tts
//!
//! ```toml
//! port = 8787
//! voice_server_url = "http://127.0.0.1:8000"
//!
//! [storage]
//! bucket = "dailylesson-media"
//! custom_domain = "media.mynextlesson.com"
//! ```
//!
//! Storage credentials are read from `CLOUDFLARE_ACCOUNT_ID`, `R2_*` first.

use dl_common::config::{LoggingConfig, StorageConfig};
use serde::Deserialize;
use std::path::PathBuf;

pub const MODULE_NAME: &str = "dl-tts";
pub const DEFAULT_PORT: u16 = 8787;

#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the speech synthesis server
    #[serde(default = "default_voice_server_url")]
    pub voice_server_url: String,

    /// Voice server request timeout, seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            data_dir: None,
            voice_server_url: default_voice_server_url(),
            timeout_secs: default_timeout_secs(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_voice_server_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}
