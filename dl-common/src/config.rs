//! Configuration loading and data folder resolution
//!
//! Every service bootstraps from a small TOML file. Missing files are not an
//! error: the service logs a warning and starts on built-in defaults.
//!
//! Config file lookup order:
//! 1. Command-line argument (`--config`)
//! 2. `DAILYLESSON_CONFIG` environment variable
//! 3. `<config_dir>/dailylesson/<module>.toml`
//! 4. `/etc/dailylesson/<module>.toml` (Linux only)

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "DAILYLESSON_CONFIG";

/// Environment variable naming the data folder
pub const DATA_DIR_ENV_VAR: &str = "DAILYLESSON_DATA_DIR";

const APP_DIR_NAME: &str = "dailylesson";

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// S3-compatible object storage settings (Cloudflare R2)
///
/// Every field may also come from the environment, which wins over TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// `CLOUDFLARE_ACCOUNT_ID`
    #[serde(default)]
    pub account_id: Option<String>,
    /// `R2_ACCESS_KEY_ID`
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// `R2_SECRET_ACCESS_KEY`
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// `R2_BUCKET_NAME`
    #[serde(default)]
    pub bucket: Option<String>,
    /// `R2_CUSTOM_DOMAIN` - public hostname serving the bucket
    #[serde(default)]
    pub custom_domain: Option<String>,
    /// Explicit endpoint, replaces `https://<account>.r2.cloudflarestorage.com`
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Signing region
    #[serde(default = "default_region")]
    pub region: String,
    /// Local folder used when no bucket credentials are configured
    #[serde(default)]
    pub local_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            access_key_id: None,
            secret_access_key: None,
            bucket: None,
            custom_domain: None,
            endpoint: None,
            region: default_region(),
            local_dir: None,
        }
    }
}

fn default_region() -> String {
    "auto".to_string()
}

/// Fully resolved bucket credentials
#[derive(Debug, Clone)]
pub struct BucketCredentials {
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub region: String,
    pub custom_domain: Option<String>,
}

impl StorageConfig {
    /// Overlay `CLOUDFLARE_ACCOUNT_ID` / `R2_*` environment variables
    pub fn with_env_overrides(self) -> Self {
        Self {
            account_id: env_or("CLOUDFLARE_ACCOUNT_ID", self.account_id),
            access_key_id: env_or("R2_ACCESS_KEY_ID", self.access_key_id),
            secret_access_key: env_or("R2_SECRET_ACCESS_KEY", self.secret_access_key),
            bucket: env_or("R2_BUCKET_NAME", self.bucket),
            custom_domain: env_or("R2_CUSTOM_DOMAIN", self.custom_domain),
            endpoint: self.endpoint,
            region: self.region,
            local_dir: self.local_dir,
        }
    }

    /// Bucket credentials, or `None` when any required value is missing
    pub fn bucket_credentials(&self) -> Option<BucketCredentials> {
        let endpoint = match (&self.endpoint, &self.account_id) {
            (Some(endpoint), _) if is_valid_value(endpoint) => {
                endpoint.trim_end_matches('/').to_string()
            }
            (_, Some(account)) if is_valid_value(account) => {
                format!("https://{}.r2.cloudflarestorage.com", account)
            }
            _ => return None,
        };

        Some(BucketCredentials {
            endpoint,
            access_key_id: self.access_key_id.clone().filter(|v| is_valid_value(v))?,
            secret_access_key: self.secret_access_key.clone().filter(|v| is_valid_value(v))?,
            bucket: self.bucket.clone().filter(|v| is_valid_value(v))?,
            region: self.region.clone(),
            custom_domain: self.custom_domain.clone().filter(|v| is_valid_value(v)),
        })
    }
}

/// Value is present (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Resolve a setting from the environment first, then the TOML value
///
/// Blank values are treated as absent at both tiers.
pub fn env_or(env_var: &str, toml_value: Option<String>) -> Option<String> {
    if let Ok(value) = std::env::var(env_var) {
        if is_valid_value(&value) {
            return Some(value);
        }
    }
    toml_value.filter(|v| is_valid_value(v))
}

/// Locate the TOML config file for a module
///
/// Returns `None` when no candidate exists; callers then run on defaults.
pub fn config_file_path(cli_arg: Option<&Path>, module_name: &str) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if is_valid_value(&path) {
            return Some(PathBuf::from(path));
        }
    }

    let file_name = format!("{}.toml", module_name);
    if let Some(user_config) = dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(&file_name)) {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc").join(APP_DIR_NAME).join(&file_name);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Load a TOML config file, falling back to defaults when it is missing
///
/// A file that exists but cannot be read or parsed is an error.
pub fn load_toml_config<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        warn!("No config file found, using built-in defaults");
        return Ok(T::default());
    };

    if !path.exists() {
        warn!("Config file {} not found, using built-in defaults", path.display());
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Data folder resolution
///
/// 1. Command-line argument (highest priority)
/// 2. `DAILYLESSON_DATA_DIR` environment variable
/// 3. TOML `data_dir`
/// 4. OS-dependent default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&Path>, toml_value: Option<&Path>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(DATA_DIR_ENV_VAR) {
        if is_valid_value(&path) {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    default_data_dir()
}

/// OS-dependent default data folder
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./dailylesson_data"))
}

/// Create a directory (and parents) if it does not exist
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        info!("Created directory: {}", path.display());
    }
    Ok(())
}
