// ==========================================
// Trade Import - Object Storage
// ==========================================
// External collaborator boundary: the hosted platform's object store,
// reduced to the two operations the import core needs. The shipped
// implementation maps buckets to directories under a local root, which
// is also what the tests run against.
// ==========================================

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("object not found: {bucket}/{path}")]
    NotFound { bucket: String, path: String },

    #[error("invalid object path: {0}")]
    InvalidPath(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blob get/put, keyed by (bucket, path). No listing, no deletes -
/// the import core never needs them.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError>;

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

// ==========================================
// LocalFileStorage
// ==========================================
/// Filesystem-backed storage: `<root>/<bucket>/<path>`.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf, StorageError> {
        // Keep objects inside the root: no parent traversal, no
        // absolute paths smuggled in through bucket or key.
        for raw in [bucket, path] {
            let p = Path::new(raw);
            if p.is_absolute()
                || p.components()
                    .any(|c| matches!(c, Component::ParentDir | Component::RootDir))
            {
                return Err(StorageError::InvalidPath(format!("{bucket}/{path}")));
            }
        }
        Ok(self.root.join(bucket).join(path))
    }
}

#[async_trait]
impl ObjectStorage for LocalFileStorage {
    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.object_path(bucket, path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound {
                    bucket: bucket.to_string(),
                    path: path.to_string(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let full = self.object_path(bucket, path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await?;
        Ok(())
    }
}
