//! Bootstrap configuration for dl-lessons
//!
//! ```toml
//! port = 3000
//! bind_address = "127.0.0.1"
//! data_dir = "/var/lib/dailylesson"
//! lesson_dir = "/var/lib/dailylesson/lessons"
//! curriculum_dir = "/var/lib/dailylesson/curriculum"
//! site_base_url = "https://mynextlesson.com"
//!
//! [logging]
//! level = "info"
//! ```

use dl_common::config::LoggingConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const MODULE_NAME: &str = "dl-lessons";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Deserialize)]
pub struct LessonsConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Extra lesson DNA files (`*.json`), merged over the built-in lessons
    #[serde(default)]
    pub lesson_dir: Option<PathBuf>,

    /// Month curriculum files; defaults to `<data_dir>/curriculum`
    #[serde(default)]
    pub curriculum_dir: Option<PathBuf>,

    /// User store file; defaults to `<data_dir>/users.json`
    #[serde(default)]
    pub user_store: Option<PathBuf>,

    /// Public site origin used for sitemap URLs
    #[serde(default = "default_site_base_url")]
    pub site_base_url: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for LessonsConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            data_dir: None,
            lesson_dir: None,
            curriculum_dir: None,
            user_store: None,
            site_base_url: default_site_base_url(),
            logging: LoggingConfig::default(),
        }
    }
}

impl LessonsConfig {
    pub fn curriculum_dir(&self, data_dir: &Path) -> PathBuf {
        self.curriculum_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("curriculum"))
    }

    pub fn user_store_path(&self, data_dir: &Path) -> PathBuf {
        self.user_store
            .clone()
            .unwrap_or_else(|| data_dir.join("users.json"))
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_site_base_url() -> String {
    "https://mynextlesson.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: LessonsConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.site_base_url, "https://mynextlesson.com");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_derived_paths() {
        let config: LessonsConfig = toml::from_str(
            r#"
            port = 8080
            curriculum_dir = "/srv/curriculum"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        let data_dir = Path::new("/data");
        assert_eq!(config.port, 8080);
        assert_eq!(config.curriculum_dir(data_dir), PathBuf::from("/srv/curriculum"));
        assert_eq!(config.user_store_path(data_dir), PathBuf::from("/data/users.json"));
        assert_eq!(config.logging.level, "debug");
    }
}
