//! Fixed values of the photo subsystem.

/// Upper bound on photo rows per meeting. Enforced by the metadata store at insert time.
pub const MAX_PHOTOS_PER_MEETING: usize = 3;

/// Largest accepted source file, before recompression (10 MiB).
pub const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Longest side of a recompressed photo, in pixels.
pub const MAX_PHOTO_DIMENSION: u32 = 1920;

/// JPEG quality used for every recompressed photo (0-100 scale).
pub const JPEG_QUALITY: u8 = 70;

/// Every stored photo is normalized to JPEG.
pub const PHOTO_CONTENT_TYPE: &str = "image/jpeg";
pub const PHOTO_EXTENSION: &str = "jpg";

pub const DEFAULT_PHOTO_BUCKET: &str = "meeting-photos";
