//! Huddle Core Library
//!
//! Domain models, error types, constants and configuration shared by the
//! meeting-photo crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, PhotoServiceConfig, PhotoSettings};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{NewPhotoRecord, PhotoRecord};
pub use storage_types::StorageBackend;
