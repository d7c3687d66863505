//! Upload persistence
//!
//! Uploaded images are written to a unique file per request so that
//! concurrent requests never classify or notify with each other's image.
//! Files are removed best-effort once the request that created them is
//! finished with them.

use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to create upload directory {dir}: {source}")]
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write upload {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A persisted upload
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub id: Uuid,
    pub path: PathBuf,
}

/// Writes uploads into the configured directory
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                dir: self.dir.clone(),
                source,
            })
    }

    /// Persist `bytes` under a fresh unique name.
    ///
    /// The written file is byte-identical to the payload.
    pub async fn store(&self, bytes: &[u8]) -> Result<StoredImage, StorageError> {
        self.ensure_dir().await?;

        let id = Uuid::new_v4();
        let path = self.dir.join(format!("{id}.jpg"));

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = bytes.len(), "upload stored");
        Ok(StoredImage { id, path })
    }

    /// Best-effort removal of a stored upload
    pub async fn remove(&self, image: &StoredImage) {
        if let Err(err) = tokio::fs::remove_file(&image.path).await {
            debug!(
                path = %image.path.display(),
                error = %err,
                "failed to remove stored upload"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> ImageStore {
        let dir = std::env::temp_dir().join(format!("pollution-watch-test-{}", Uuid::new_v4()));
        ImageStore::new(dir)
    }

    #[tokio::test]
    async fn test_stored_bytes_are_identical() {
        let store = temp_store();
        let payload = b"\xff\xd8\xff\xe0 not really a jpeg \x00\x01\x02";

        let stored = store.store(payload).await.unwrap();
        let written = tokio::fs::read(&stored.path).await.unwrap();

        assert_eq!(written, payload);
        store.remove(&stored).await;
    }

    #[tokio::test]
    async fn test_concurrent_uploads_get_distinct_paths() {
        let store = temp_store();

        let first = store.store(b"first").await.unwrap();
        let second = store.store(b"second").await.unwrap();

        assert_ne!(first.path, second.path);
        assert_eq!(tokio::fs::read(&first.path).await.unwrap(), b"first");
        assert_eq!(tokio::fs::read(&second.path).await.unwrap(), b"second");

        store.remove(&first).await;
        store.remove(&second).await;
    }

    #[tokio::test]
    async fn test_remove_deletes_file() {
        let store = temp_store();
        let stored = store.store(b"payload").await.unwrap();

        store.remove(&stored).await;
        assert!(!stored.path.exists());

        // Removing again is a no-op, not a panic
        store.remove(&stored).await;
    }
}
