//! Listing and deleting meeting photos.

use std::sync::Arc;

use huddle_core::{AppError, PhotoRecord};
use huddle_db::PhotoStore;
use huddle_storage::{storage_key_from_url, Storage, StorageError};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("Photo not found: {0}")]
    NotFound(Uuid),

    #[error("Cannot derive a storage key from photo URL: {0}")]
    InvalidPhotoUrl(String),

    #[error("Failed to remove photo blob: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Metadata(#[from] AppError),
}

pub struct PhotoGallery {
    storage: Arc<dyn Storage>,
    store: Arc<dyn PhotoStore>,
}

impl PhotoGallery {
    pub fn new(storage: Arc<dyn Storage>, store: Arc<dyn PhotoStore>) -> Self {
        Self { storage, store }
    }

    /// Photos of a meeting, newest first.
    pub async fn list(&self, meeting_id: Uuid) -> Result<Vec<PhotoRecord>, GalleryError> {
        Ok(self.store.list_for_meeting(meeting_id).await?)
    }

    /// Remove the blob, then the row.
    ///
    /// The storage key is the last two path segments of the stored URL. If the
    /// blob cannot be removed the row is kept.
    pub async fn delete(&self, photo_id: Uuid) -> Result<PhotoRecord, GalleryError> {
        let photo = self
            .store
            .get(photo_id)
            .await?
            .ok_or(GalleryError::NotFound(photo_id))?;

        let key = storage_key_from_url(&photo.photo_url)
            .ok_or_else(|| GalleryError::InvalidPhotoUrl(photo.photo_url.clone()))?;

        self.storage.remove(std::slice::from_ref(&key)).await?;

        if !self.store.delete(photo_id).await? {
            // Deleted concurrently between the lookup and now.
            return Err(GalleryError::NotFound(photo_id));
        }

        tracing::info!(
            photo_id = %photo_id,
            meeting_id = %photo.meeting_id,
            key = %key,
            "Photo deleted"
        );

        Ok(photo)
    }
}
