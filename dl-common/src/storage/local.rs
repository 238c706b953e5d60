use super::{validate_key, ObjectStore, PutObject};
use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Folder-backed object store
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path an object key maps to
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |path, segment| path.join(segment)))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, object: PutObject) -> Result<String> {
        let path = self.path_for(&object.key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &object.body).await?;

        debug!(
            key = %object.key,
            bytes = object.body.len(),
            content_type = %object.content_type,
            "Stored object locally"
        );

        let absolute = tokio::fs::canonicalize(&path).await.unwrap_or(path);
        Ok(format!("file://{}", absolute.display()))
    }

    fn describe(&self) -> String {
        format!("local folder {}", self.root.display())
    }
}
