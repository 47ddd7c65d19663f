//! Photo metadata repositories.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use huddle_core::{AppError, NewPhotoRecord, PhotoRecord};
use uuid::Uuid;

/// Why the store refused to insert a photo row.
#[derive(Debug, thiserror::Error)]
pub enum InsertRejection {
    /// The meeting already holds the maximum number of photos.
    #[error("Maximum {limit} photos allowed per meeting {meeting_id}")]
    LimitExceeded { meeting_id: Uuid, limit: usize },

    /// Any other insert failure.
    #[error("Photo insert failed: {0}")]
    Other(#[from] AppError),
}

/// Metadata store for photo rows.
///
/// Implementations enforce the per-meeting photo limit atomically at insert
/// time. Callers must not pre-check the count themselves.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Insert a row, or reject it with a structured reason.
    async fn insert(&self, photo: NewPhotoRecord) -> Result<PhotoRecord, InsertRejection>;

    /// Photos of a meeting, newest first.
    async fn list_for_meeting(&self, meeting_id: Uuid) -> Result<Vec<PhotoRecord>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<PhotoRecord>, AppError>;

    /// Delete a row. Returns `false` when nothing matched.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
