use std::sync::Arc;

use huddle_core::{NewPhotoRecord, PhotoRecord};
use huddle_db::{InsertRejection, PhotoStore};
use uuid::Uuid;

use super::types::StoredBlob;
use crate::error::PipelineError;

/// Persists a photo row for an uploaded blob.
///
/// The per-meeting limit is enforced by the store during the insert; a
/// rejection becomes [`PipelineError::PhotoLimitExceeded`]. The blob is left in
/// storage either way.
pub struct MetadataRecorder {
    store: Arc<dyn PhotoStore>,
}

impl MetadataRecorder {
    pub fn new(store: Arc<dyn PhotoStore>) -> Self {
        Self { store }
    }

    pub async fn record(
        &self,
        meeting_id: Uuid,
        file_name: &str,
        blob: &StoredBlob,
    ) -> Result<PhotoRecord, PipelineError> {
        let row = NewPhotoRecord {
            meeting_id,
            photo_url: blob.storage_url.clone(),
            file_name: file_name.to_string(),
            file_size: blob.size as i64,
        };

        self.store.insert(row).await.map_err(|rejection| match rejection {
            InsertRejection::LimitExceeded { meeting_id, limit } => {
                PipelineError::PhotoLimitExceeded { meeting_id, limit }
            }
            InsertRejection::Other(e) => PipelineError::MetadataWrite(e),
        })
    }
}
