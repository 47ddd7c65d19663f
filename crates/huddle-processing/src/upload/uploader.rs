use std::sync::Arc;

use huddle_storage::{photo_key, Storage, StorageResult};
use uuid::Uuid;

use super::types::{ProcessedImage, StoredBlob};
use crate::clock::KeyClock;

/// Writes recompressed photos to blob storage under `{meeting_id}/{epoch_millis}.jpg`.
pub struct PhotoUploader {
    storage: Arc<dyn Storage>,
    clock: KeyClock,
}

impl PhotoUploader {
    pub fn new(storage: Arc<dyn Storage>, clock: KeyClock) -> Self {
        Self { storage, clock }
    }

    /// Single attempt, no retry. The image buffer is consumed by the write.
    pub async fn upload(
        &self,
        meeting_id: Uuid,
        image: ProcessedImage,
    ) -> StorageResult<StoredBlob> {
        let storage_key = photo_key(meeting_id, self.clock.next_millis());
        let content_type = image.content_type();
        let size = image.len();

        self.storage
            .put(&storage_key, image.data, content_type)
            .await?;

        let storage_url = self.storage.public_url(&storage_key);

        tracing::debug!(
            meeting_id = %meeting_id,
            key = %storage_key,
            size_bytes = size,
            "Photo blob stored"
        );

        Ok(StoredBlob {
            storage_key,
            storage_url,
            size,
        })
    }
}
