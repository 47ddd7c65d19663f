//! Shared key generation for storage backends.
//!
//! Key format: `{meeting_id}/{epoch_millis}.{ext}`, where `ext` is the
//! extension of the normalized output format.

use huddle_core::constants::PHOTO_EXTENSION;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Generate the storage key for a photo of `meeting_id` taken at `epoch_millis`.
pub fn photo_key(meeting_id: Uuid, epoch_millis: i64) -> String {
    format!("{}/{}.{}", meeting_id, epoch_millis, PHOTO_EXTENSION)
}

/// Recover a storage key from a public URL: the last two path segments, joined by `/`.
///
/// Query strings and fragments are ignored and segments are percent-decoded.
/// Returns `None` when the URL has fewer than two non-empty segments.
pub fn storage_key_from_url(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let path = without_fragment
        .split('?')
        .next()
        .unwrap_or(without_fragment);

    let mut segments = path.rsplit('/');
    let file = segments.next().filter(|s| !s.is_empty())?;
    let folder = segments.next().filter(|s| !s.is_empty())?;

    let file = urlencoding::decode(file).ok()?;
    let folder = urlencoding::decode(folder).ok()?;
    Some(format!("{}/{}", folder, file))
}

/// Reject keys that could escape a storage root.
pub(crate) fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
