pub mod blobs;
pub mod local;
pub mod s3;
pub mod submissions;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StorageBackend;

pub use blobs::BlobStore;
pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;
pub use submissions::SubmissionStore;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    NotFound(String),
    AlreadyExists(String),
    InvalidKey(String),
    TooLarge { size: usize, max: usize },
    Serialization(serde_json::Error),
    Io(std::io::Error),
    Backend(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::NotFound(key) => write!(f, "object not found: {key}"),
            StorageError::AlreadyExists(key) => write!(f, "object already exists: {key}"),
            StorageError::InvalidKey(key) => write!(f, "invalid object key: {key:?}"),
            StorageError::TooLarge { size, max } => {
                write!(f, "object of {size} bytes exceeds limit of {max} bytes")
            }
            StorageError::Serialization(err) => write!(f, "serialization failed: {err}"),
            StorageError::Io(err) => write!(f, "I/O error: {err}"),
            StorageError::Backend(msg) => write!(f, "backend error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Serialization(err) => Some(err),
            StorageError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err)
    }
}

/// Keyed byte storage shared by the blob and submission stores.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Replaces the object at `key` atomically: readers see either the old
    /// bytes or the new bytes, never a partial write.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> StorageResult<()>;

    /// Stores a new object. Fails with `AlreadyExists` instead of replacing.
    async fn put_new(&self, key: &str, data: &[u8], content_type: &str) -> StorageResult<()>;

    /// Fetches the object at `key`, or `NotFound`.
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Human-readable location for startup logs.
    fn describe(&self) -> String;
}

/// Build the object store selected by configuration.
pub async fn connect(backend: &StorageBackend) -> StorageResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match backend {
        StorageBackend::Local { data_dir } => {
            Arc::new(LocalObjectStore::open(data_dir.clone()).await?) as Arc<dyn ObjectStore>
        }
        StorageBackend::S3(s3) => Arc::new(S3ObjectStore::connect(s3).await),
    };
    tracing::info!("Storage backend: {}", store.describe());
    Ok(store)
}
