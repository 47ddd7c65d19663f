//! Meeting photo metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// A persisted photo row. Owned by the metadata store once inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct PhotoRecord {
    pub id: Uuid,
    pub meeting_id: Uuid,
    /// Public retrieval URL; its last two path segments are the storage key.
    pub photo_url: String,
    /// Caller-supplied name of the source file, stored as given.
    pub file_name: String,
    /// Size of the recompressed image in bytes.
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a photo row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhotoRecord {
    pub meeting_id: Uuid,
    pub photo_url: String,
    pub file_name: String,
    pub file_size: i64,
}
