//! Postgres photo repository: CRUD for the meeting_photos table.

use async_trait::async_trait;
use huddle_core::constants::MAX_PHOTOS_PER_MEETING;
use huddle_core::{AppError, NewPhotoRecord, PhotoRecord};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use super::{InsertRejection, PhotoStore};

/// Constraint name raised by the insert trigger when a meeting is full.
pub const PHOTO_LIMIT_CONSTRAINT: &str = "meeting_photos_max_three";

const CHECK_VIOLATION: &str = "23514";

/// Repository for the meeting_photos table.
#[derive(Clone)]
pub struct PhotoRepository {
    pool: PgPool,
}

impl PhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// True when a database error is the trigger's photo-limit rejection.
fn is_limit_violation(code: Option<&str>, constraint: Option<&str>) -> bool {
    code == Some(CHECK_VIOLATION) && constraint == Some(PHOTO_LIMIT_CONSTRAINT)
}

fn classify_insert_error(err: sqlx::Error, meeting_id: Uuid) -> InsertRejection {
    if let sqlx::Error::Database(ref db_err) = err {
        if is_limit_violation(db_err.code().as_deref(), db_err.constraint()) {
            return InsertRejection::LimitExceeded {
                meeting_id,
                limit: MAX_PHOTOS_PER_MEETING,
            };
        }
    }
    InsertRejection::Other(AppError::from(err))
}

#[async_trait]
impl PhotoStore for PhotoRepository {
    #[tracing::instrument(skip(self, photo), fields(db.table = "meeting_photos", meeting_id = %photo.meeting_id))]
    async fn insert(&self, photo: NewPhotoRecord) -> Result<PhotoRecord, InsertRejection> {
        sqlx::query_as::<Postgres, PhotoRecord>(
            r#"
            INSERT INTO meeting_photos (meeting_id, photo_url, file_name, file_size)
            VALUES ($1, $2, $3, $4)
            RETURNING id, meeting_id, photo_url, file_name, file_size, created_at
            "#,
        )
        .bind(photo.meeting_id)
        .bind(&photo.photo_url)
        .bind(&photo.file_name)
        .bind(photo.file_size)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify_insert_error(e, photo.meeting_id))
    }

    #[tracing::instrument(skip(self), fields(db.table = "meeting_photos"))]
    async fn list_for_meeting(&self, meeting_id: Uuid) -> Result<Vec<PhotoRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, PhotoRecord>(
            r#"
            SELECT id, meeting_id, photo_url, file_name, file_size, created_at
            FROM meeting_photos
            WHERE meeting_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(meeting_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "meeting_photos", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<PhotoRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, PhotoRecord>(
            "SELECT id, meeting_id, photo_url, file_name, file_size, created_at FROM meeting_photos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "meeting_photos", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM meeting_photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_violation_requires_code_and_constraint() {
        assert!(is_limit_violation(Some("23514"), Some(PHOTO_LIMIT_CONSTRAINT)));
        assert!(!is_limit_violation(Some("23514"), Some("meeting_photos_file_size_check")));
        assert!(!is_limit_violation(Some("23505"), Some(PHOTO_LIMIT_CONSTRAINT)));
        assert!(!is_limit_violation(None, None));
    }

    #[test]
    fn non_database_errors_are_other() {
        let rejection = classify_insert_error(sqlx::Error::PoolTimedOut, Uuid::new_v4());
        assert!(matches!(rejection, InsertRejection::Other(AppError::Database(_))));
    }
}
