//! Per-entry failure taxonomy of the photo pipeline.

use huddle_core::{AppError, ErrorMetadata, LogLevel};
use huddle_storage::StorageError;
use uuid::Uuid;

use crate::compression::CompressionError;
use crate::validator::ValidationError;

/// Why one entry of a batch did not become a stored photo.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The caller could not read the source file.
    #[error("Failed to read {file_name}: {reason}")]
    SourceRead { file_name: String, reason: String },

    #[error("Invalid media type: {content_type}")]
    InvalidMediaType { content_type: String },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Upload failed: {0}")]
    Upload(#[source] StorageError),

    #[error("Maximum {limit} photos allowed per meeting")]
    PhotoLimitExceeded { meeting_id: Uuid, limit: usize },

    #[error("Failed to record photo metadata: {0}")]
    MetadataWrite(#[source] AppError),
}

impl From<ValidationError> for PipelineError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidMediaType { content_type } => {
                PipelineError::InvalidMediaType { content_type }
            }
            ValidationError::FileTooLarge { size, max } => PipelineError::FileTooLarge { size, max },
        }
    }
}

impl From<CompressionError> for PipelineError {
    fn from(err: CompressionError) -> Self {
        match err {
            CompressionError::Decode(msg) => PipelineError::Decode(msg),
            CompressionError::Encode(msg) => PipelineError::Encode(msg),
        }
    }
}

impl From<StorageError> for PipelineError {
    fn from(err: StorageError) -> Self {
        PipelineError::Upload(err)
    }
}

impl PipelineError {
    /// True for the per-meeting limit, which callers surface differently.
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, PipelineError::PhotoLimitExceeded { .. })
    }

    /// Stage of the pipeline that produced the error.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::SourceRead { .. } => "read",
            PipelineError::InvalidMediaType { .. } | PipelineError::FileTooLarge { .. } => {
                "validate"
            }
            PipelineError::Decode(_) | PipelineError::Encode(_) => "recompress",
            PipelineError::Upload(_) => "upload",
            PipelineError::PhotoLimitExceeded { .. } | PipelineError::MetadataWrite(_) => "record",
        }
    }
}

impl ErrorMetadata for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            PipelineError::SourceRead { .. } => "SOURCE_READ_ERROR",
            PipelineError::InvalidMediaType { .. } => "INVALID_MEDIA_TYPE",
            PipelineError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            PipelineError::Decode(_) => "DECODE_ERROR",
            PipelineError::Encode(_) => "ENCODE_ERROR",
            PipelineError::Upload(_) => "UPLOAD_ERROR",
            PipelineError::PhotoLimitExceeded { .. } => "PHOTO_LIMIT_EXCEEDED",
            PipelineError::MetadataWrite(_) => "METADATA_WRITE_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            PipelineError::MetadataWrite(e) => e.is_recoverable(),
            PipelineError::SourceRead { .. }
            | PipelineError::Upload(_)
            | PipelineError::PhotoLimitExceeded { .. } => true,
            PipelineError::InvalidMediaType { .. }
            | PipelineError::FileTooLarge { .. }
            | PipelineError::Decode(_)
            | PipelineError::Encode(_) => false,
        }
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            PipelineError::SourceRead { .. } => Some("Check the file exists and is readable"),
            PipelineError::InvalidMediaType { .. } => Some("Select only image files"),
            PipelineError::FileTooLarge { .. } => Some("Select a smaller image"),
            PipelineError::Decode(_) => Some("Check the image is not corrupted"),
            PipelineError::Encode(_) => Some("Try a different image"),
            PipelineError::Upload(_) => Some("Retry after a short delay"),
            PipelineError::MetadataWrite(e) => e.suggested_action(),
            PipelineError::PhotoLimitExceeded { .. } => {
                Some("Delete an existing photo before adding another")
            }
        }
    }

    /// The photo limit gets its own wording; every other failure is a generic
    /// message with the underlying detail appended.
    fn client_message(&self) -> String {
        match self {
            PipelineError::PhotoLimitExceeded { limit, .. } => {
                format!("Maximum {} photos allowed per meeting.", limit)
            }
            other => format!("Failed to upload photo: {}", other),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            PipelineError::InvalidMediaType { .. } | PipelineError::FileTooLarge { .. } => {
                LogLevel::Debug
            }
            PipelineError::SourceRead { .. }
            | PipelineError::Decode(_)
            | PipelineError::PhotoLimitExceeded { .. } => LogLevel::Warn,
            PipelineError::Encode(_) | PipelineError::Upload(_) => LogLevel::Error,
            PipelineError::MetadataWrite(e) => e.log_level(),
        }
    }
}
