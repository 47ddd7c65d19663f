//! Batch outcomes and the notices rendered from them.

use huddle_core::{ErrorMetadata, PhotoRecord};
use serde::Serialize;
use uuid::Uuid;

use crate::error::PipelineError;

/// Rounded kilobytes, as shown to users.
pub fn kilobytes(bytes: usize) -> u64 {
    (bytes as f64 / 1024.0).round() as u64
}

/// Short size for messages: whole megabytes from 1 MiB up, kilobytes below.
fn size_label(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB {
        format!("{}MB", (bytes + MIB / 2) / MIB)
    } else {
        format!("{}KB", bytes.div_ceil(1024).max(1))
    }
}

/// Result of one batch entry.
#[derive(Debug)]
pub struct EntryOutcome {
    /// Position of the entry in the submitted batch.
    pub index: usize,
    pub file_name: String,
    /// Byte length of the source file.
    pub original_size: usize,
    pub result: Result<PhotoRecord, PipelineError>,
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn notice(&self) -> Notice {
        match &self.result {
            Ok(photo) => Notice::success(
                "Photo Uploaded",
                format!(
                    "Photo compressed and uploaded successfully. Size reduced from {}KB to {}KB.",
                    kilobytes(self.original_size),
                    kilobytes(photo.file_size.max(0) as usize)
                ),
            ),
            Err(PipelineError::InvalidMediaType { .. }) => {
                Notice::destructive("Invalid File", "Please select only image files.")
            }
            Err(PipelineError::FileTooLarge { max, .. }) => Notice::destructive(
                "File Too Large",
                format!("Please select images smaller than {}.", size_label(*max)),
            ),
            Err(err @ PipelineError::PhotoLimitExceeded { .. }) => {
                Notice::destructive("Photo Limit Reached", err.client_message())
            }
            Err(err) => Notice::destructive("Upload Failed", err.client_message()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Destructive,
}

/// A user-facing message for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    fn success(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Success,
        }
    }

    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Ordered outcomes of one batch, one per submitted file.
#[derive(Debug)]
pub struct BatchReport {
    pub meeting_id: Uuid,
    pub entries: Vec<EntryOutcome>,
}

impl BatchReport {
    pub fn new(meeting_id: Uuid) -> Self {
        Self {
            meeting_id,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &PhotoRecord> {
        self.entries.iter().filter_map(|e| e.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&EntryOutcome, &PipelineError)> {
        self.entries
            .iter()
            .filter_map(|e| e.result.as_ref().err().map(|err| (e, err)))
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.entries.iter().map(EntryOutcome::notice).collect()
    }

    /// Serializable view for machine-readable output.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            meeting_id: self.meeting_id,
            succeeded: self.success_count(),
            failed: self.failure_count(),
            entries: self
                .entries
                .iter()
                .map(|entry| EntrySummary {
                    index: entry.index,
                    file_name: entry.file_name.clone(),
                    original_size: entry.original_size,
                    photo: entry.result.as_ref().ok().cloned(),
                    error: entry.result.as_ref().err().map(|err| EntryErrorSummary {
                        code: err.error_code(),
                        message: err.to_string(),
                        recoverable: err.is_recoverable(),
                        suggested_action: err.suggested_action(),
                    }),
                    notice: entry.notice(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub meeting_id: Uuid,
    pub succeeded: usize,
    pub failed: usize,
    pub entries: Vec<EntrySummary>,
}

#[derive(Debug, Serialize)]
pub struct EntrySummary {
    pub index: usize,
    pub file_name: String,
    pub original_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EntryErrorSummary>,
    pub notice: Notice,
}

#[derive(Debug, Serialize)]
pub struct EntryErrorSummary {
    pub code: &'static str,
    pub message: String,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<&'static str>,
}
