//! Content-addressable audio storage
//!
//! The pipeline never interprets audio bytes; it stores, fetches, and hands
//! them to the speech-to-text service. `BlobStore` is the seam, and
//! `LocalBlobStore` is a directory-rooted implementation suitable for a
//! single-host deployment (uuid-keyed files under the configured
//! recordings directory, expiring `file://` URLs for playback).

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob {0} not found")]
    NotFound(String),

    #[error("invalid blob path: {0}")]
    InvalidPath(String),

    #[error("blob I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage for opaque audio blobs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store the bytes and return an opaque path/key for later retrieval.
    async fn upload(&self, bytes: &[u8]) -> Result<String, BlobError>;

    async fn download(&self, path: &str) -> Result<Vec<u8>, BlobError>;

    /// Time-limited URL a client can fetch the audio from directly.
    async fn signed_url(&self, path: &str, ttl: Duration) -> Result<String, BlobError>;

    async fn delete(&self, path: &str) -> Result<(), BlobError>;
}

/// Blob store rooted at a local directory.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a stored key to a filesystem path, rejecting anything that
    /// would escape the root directory.
    fn resolve(&self, path: &str) -> Result<PathBuf, BlobError> {
        let relative = Path::new(path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(BlobError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, bytes: &[u8]) -> Result<String, BlobError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let key = format!("{}.audio", Uuid::new_v4());
        let full_path = self.root.join(&key);
        tokio::fs::write(&full_path, bytes).await?;

        info!("Stored audio blob {} ({} bytes)", key, bytes.len());
        Ok(key)
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, BlobError> {
        let full_path = self.resolve(path)?;
        match tokio::fs::read(&full_path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn signed_url(&self, path: &str, ttl: Duration) -> Result<String, BlobError> {
        let full_path = self.resolve(path)?;
        if !full_path.exists() {
            return Err(BlobError::NotFound(path.to_string()));
        }

        // A local deployment has no signing authority; an expiry marker in
        // the query keeps the URL shape consistent with hosted stores.
        let expires = Utc::now() + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::hours(1));
        Ok(format!(
            "file://{}?expires={}",
            full_path.display(),
            expires.timestamp()
        ))
    }

    async fn delete(&self, path: &str) -> Result<(), BlobError> {
        let full_path = self.resolve(path)?;
        match tokio::fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn upload_download_roundtrip() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let key = store.upload(b"fake audio bytes").await.unwrap();
        let bytes = store.download(&key).await.unwrap();
        assert_eq!(bytes, b"fake audio bytes");
    }

    #[tokio::test]
    async fn download_missing_blob_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let err = store.download("nope.audio").await.unwrap_err();
        assert!(matches!(err, BlobError::NotFound(_)));
    }

    #[tokio::test]
    async fn path_escape_is_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let err = store.download("../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, BlobError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn signed_url_carries_expiry() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let key = store.upload(b"audio").await.unwrap();
        let url = store
            .signed_url(&key, Duration::from_secs(3600))
            .await
            .unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.contains("expires="));
    }

    #[tokio::test]
    async fn delete_removes_blob() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());

        let key = store.upload(b"audio").await.unwrap();
        store.delete(&key).await.unwrap();
        assert!(matches!(
            store.download(&key).await.unwrap_err(),
            BlobError::NotFound(_)
        ));
    }
}
