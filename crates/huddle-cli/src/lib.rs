use std::path::Path;

use huddle_processing::{BatchEntry, PhotoValidator, PipelineError, RejectedSource, SourceImage};

/// File name shown in notices and stored with the photo.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_failure(file_name: &str, size: usize, err: std::io::Error) -> RejectedSource {
    RejectedSource {
        file_name: file_name.to_string(),
        size,
        error: PipelineError::SourceRead {
            file_name: file_name.to_string(),
            reason: err.to_string(),
        },
    }
}

/// Turn a path into one batch entry.
///
/// Type and size are checked from the extension and file metadata before any
/// bytes are read, so oversized files are never loaded. Failures become that
/// entry's outcome instead of stopping the batch.
pub async fn prepare_entry(path: &Path, validator: &PhotoValidator) -> BatchEntry {
    let file_name = display_name(path);
    let content_type = content_type_for_path(path);

    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) => return Err(read_failure(&file_name, 0, e)),
    };
    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);

    let checked = validator
        .validate_media_type(content_type)
        .and_then(|_| validator.validate_file_size(size));
    if let Err(e) = checked {
        return Err(RejectedSource {
            file_name,
            size,
            error: e.into(),
        });
    }

    match tokio::fs::read(path).await {
        Ok(data) => Ok(SourceImage::new(file_name, content_type, data)),
        Err(e) => Err(read_failure(&file_name, size, e)),
    }
}

/// Media type for a local file, from its extension.
///
/// Unknown extensions map to `application/octet-stream`, which the pipeline
/// rejects as a non-image.
pub fn content_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
