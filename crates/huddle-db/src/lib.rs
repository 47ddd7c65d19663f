//! Metadata store for meeting photos.
//!
//! The store owns the "at most three photos per meeting" invariant: inserts
//! beyond the limit are rejected with [`InsertRejection::LimitExceeded`], a
//! structured reason callers can match on.

pub mod photo;
pub mod setup;

pub use photo::memory::InMemoryPhotoStore;
pub use photo::postgres::PhotoRepository;
pub use photo::{InsertRejection, PhotoStore};
pub use setup::setup_database;
