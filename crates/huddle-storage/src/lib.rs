//! Huddle Storage Library
//!
//! Blob storage for meeting photos: the [`Storage`] trait plus S3 and local
//! filesystem backends.
//!
//! # Storage key format
//!
//! Every photo lives under `{meeting_id}/{epoch_millis}.jpg`. The gallery
//! reconstructs keys from stored public URLs by taking their last two path
//! segments, so all backends must produce URLs that end in the key. Key
//! generation and parsing live in the `keys` module.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use huddle_core::StorageBackend;
pub use keys::{photo_key, storage_key_from_url};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
