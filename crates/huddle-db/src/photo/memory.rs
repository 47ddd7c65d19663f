//! In-memory photo store.
//!
//! Enforces the same per-meeting limit as the Postgres trigger, under a lock.
//! Used by tests and by embedders that do not need persistence.

use async_trait::async_trait;
use chrono::Utc;
use huddle_core::constants::MAX_PHOTOS_PER_MEETING;
use huddle_core::{AppError, NewPhotoRecord, PhotoRecord};
use std::sync::Mutex;
use uuid::Uuid;

use super::{InsertRejection, PhotoStore};

pub struct InMemoryPhotoStore {
    rows: Mutex<Vec<PhotoRecord>>,
    limit: usize,
}

impl InMemoryPhotoStore {
    pub fn new() -> Self {
        Self::with_limit(MAX_PHOTOS_PER_MEETING)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            limit,
        }
    }

    /// Number of rows referencing a meeting.
    pub fn count_for_meeting(&self, meeting_id: Uuid) -> usize {
        // Counting only reads; a poisoned lock still holds the rows.
        let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        rows.iter().filter(|r| r.meeting_id == meeting_id).count()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<PhotoRecord>>, AppError> {
        self.rows
            .lock()
            .map_err(|_| AppError::Internal("photo store lock poisoned".to_string()))
    }
}

impl Default for InMemoryPhotoStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhotoStore for InMemoryPhotoStore {
    async fn insert(&self, photo: NewPhotoRecord) -> Result<PhotoRecord, InsertRejection> {
        let mut rows = self.lock()?;

        let existing = rows
            .iter()
            .filter(|r| r.meeting_id == photo.meeting_id)
            .count();
        if existing >= self.limit {
            return Err(InsertRejection::LimitExceeded {
                meeting_id: photo.meeting_id,
                limit: self.limit,
            });
        }

        let record = PhotoRecord {
            id: Uuid::new_v4(),
            meeting_id: photo.meeting_id,
            photo_url: photo.photo_url,
            file_name: photo.file_name,
            file_size: photo.file_size,
            created_at: Utc::now(),
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn list_for_meeting(&self, meeting_id: Uuid) -> Result<Vec<PhotoRecord>, AppError> {
        let rows = self.lock()?;
        // Rows are appended in creation order; newest first is the reverse.
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.meeting_id == meeting_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<PhotoRecord>, AppError> {
        let rows = self.lock()?;
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.lock()?;
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() != before)
    }
}
