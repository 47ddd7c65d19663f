//! Meeting photo ingestion.
//!
//! Each selected file runs through validate → recompress → upload → record.
//! Entries are processed one after another and each produces its own outcome;
//! a failing entry never stops the rest of the batch.

pub mod clock;
pub mod compression;
pub mod error;
pub mod gallery;
pub mod upload;
pub mod validator;

pub use clock::{Clock, KeyClock, SystemClock};
pub use compression::{target_dimensions, CompressionError, Recompressor};
pub use error::PipelineError;
pub use gallery::{GalleryError, PhotoGallery};
pub use upload::pipeline::PhotoPipeline;
pub use upload::report::{kilobytes, BatchReport, BatchSummary, EntryOutcome, Notice, Severity};
pub use upload::types::{BatchEntry, ProcessedImage, RejectedSource, SourceImage, StoredBlob};
pub use validator::{PhotoValidator, ValidationError};
