//! Upload flow: validate → recompress → upload → record.

pub mod pipeline;
pub mod recorder;
pub mod report;
pub mod types;
pub mod uploader;
