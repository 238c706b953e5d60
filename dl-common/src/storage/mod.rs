//! Object storage for generated media
//!
//! Lesson videos and reference voices are written through [`ObjectStore`].
//! Two backends exist:
//! - [`R2Store`]: S3-compatible bucket (Cloudflare R2), SigV4-signed `PutObject`
//! - [`LocalStore`]: plain folder, used when no bucket is configured

mod local;
mod r2;
pub mod sigv4;

pub use local::LocalStore;
pub use r2::R2Store;

use crate::config::StorageConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Object to upload
#[derive(Debug, Clone)]
pub struct PutObject {
    /// Slash-separated key, e.g. `lessons/2025-01-01/negotiation_skills.mp4`
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
    /// User metadata (`x-amz-meta-*` on S3)
    pub metadata: Vec<(String, String)>,
}

impl PutObject {
    pub fn new(key: impl Into<String>, body: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            body,
            content_type: content_type.into(),
            metadata: Vec::new(),
        }
    }

    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((name.into(), value.into()));
        self
    }
}

/// Destination for uploaded objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object, returning the URL it can be fetched from
    async fn put(&self, object: PutObject) -> Result<String>;

    /// Short description for startup logs
    fn describe(&self) -> String;
}

/// Reject keys that are empty, absolute, or climb out of the store
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidInput("Object key cannot be empty".to_string()));
    }
    if key.starts_with('/') {
        return Err(Error::InvalidInput(format!("Object key must be relative: {}", key)));
    }
    if key.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..") {
        return Err(Error::InvalidInput(format!("Invalid object key: {}", key)));
    }
    Ok(())
}

/// Build the configured store
///
/// Bucket credentials win; otherwise objects land in `local_dir`, or
/// `<data_dir>/objects` when that is unset too.
pub fn from_config(config: &StorageConfig, data_dir: &Path) -> Result<Arc<dyn ObjectStore>> {
    if let Some(credentials) = config.bucket_credentials() {
        let store = R2Store::new(credentials)?;
        info!("Object storage: {}", store.describe());
        return Ok(Arc::new(store));
    }

    let dir = config
        .local_dir
        .clone()
        .unwrap_or_else(|| data_dir.join("objects"));
    let store = LocalStore::new(dir);
    info!("Object storage: {} (no bucket credentials configured)", store.describe());
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("lessons/2025-01-01/a.mp4").is_ok());
        assert!(validate_key("voices/kelly/reference.wav").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("voices/../secrets").is_err());
        assert!(validate_key("voices//x").is_err());
    }

    #[test]
    fn test_from_config_falls_back_to_local() {
        let dir = tempfile::tempdir().unwrap();
        let store = from_config(&StorageConfig::default(), dir.path()).unwrap();
        assert!(store.describe().starts_with("local folder"));
    }

    #[test]
    fn test_from_config_uses_bucket_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            account_id: Some("acct".into()),
            access_key_id: Some("AKID".into()),
            secret_access_key: Some("secret".into()),
            bucket: Some("lessons".into()),
            region: "auto".into(),
            ..Default::default()
        };
        let store = from_config(&config, dir.path()).unwrap();
        assert!(store.describe().contains("lessons"));
    }
}
