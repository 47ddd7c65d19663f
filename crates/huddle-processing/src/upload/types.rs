//! Types for the upload pipeline.

use huddle_core::constants::{PHOTO_CONTENT_TYPE, PHOTO_EXTENSION};

use crate::error::PipelineError;

/// A file selected by the user, before validation.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Name as supplied by the caller; never sanitized or used in the storage key.
    pub file_name: String,
    /// Declared media type.
    pub content_type: String,
    pub data: Vec<u8>,
}

impl SourceImage {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Recompressed JPEG, ready to upload.
#[derive(Clone, Debug)]
pub struct ProcessedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ProcessedImage {
    pub fn content_type(&self) -> &'static str {
        PHOTO_CONTENT_TYPE
    }

    pub fn extension(&self) -> &'static str {
        PHOTO_EXTENSION
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Where an uploaded blob ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredBlob {
    pub storage_key: String,
    pub storage_url: String,
    pub size: usize,
}

/// An entry the caller refused before handing it to the pipeline, e.g. a file
/// that could not be read. It still takes its place in the batch report.
#[derive(Debug)]
pub struct RejectedSource {
    pub file_name: String,
    /// Byte length when known, 0 otherwise.
    pub size: usize,
    pub error: PipelineError,
}

/// One position in a batch.
pub type BatchEntry = Result<SourceImage, RejectedSource>;
