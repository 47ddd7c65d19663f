//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Blob store consumed by the photo pipeline and the gallery.
///
/// **Key format:** `{meeting_id}/{epoch_millis}.jpg`. See the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `storage_key`. A single attempt; errors are returned as-is.
    async fn put(&self, storage_key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Canonical public retrieval URL for a key. The URL ends with the key.
    fn public_url(&self, storage_key: &str) -> String;

    /// Remove the given keys. Keys that do not exist are ignored.
    async fn remove(&self, storage_keys: &[String]) -> StorageResult<()>;
}
