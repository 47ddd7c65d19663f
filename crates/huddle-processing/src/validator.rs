use crate::upload::types::SourceImage;

/// Why a source file was refused before decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid media type: {content_type} (expected image/*)")]
    InvalidMediaType { content_type: String },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },
}

/// Photo file validator
///
/// Checks the declared media type and the raw size. The content itself is not
/// inspected here; undecodable bytes surface later as a decode failure.
#[derive(Debug, Clone)]
pub struct PhotoValidator {
    max_file_size: usize,
}

impl PhotoValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Accepts any `image/<subtype>` media type, case-insensitively.
    pub fn validate_media_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.trim().to_ascii_lowercase();

        let is_image = normalized
            .strip_prefix("image/")
            .is_some_and(|subtype| !subtype.is_empty());

        if !is_image {
            return Err(ValidationError::InvalidMediaType {
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    /// Exactly `max_file_size` bytes is still accepted.
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Media type first, then size.
    pub fn validate(&self, source: &SourceImage) -> Result<(), ValidationError> {
        self.validate_media_type(&source.content_type)?;
        self.validate_file_size(source.len())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN_MB: usize = 10 * 1024 * 1024;

    #[test]
    fn test_accepts_image_subtypes() {
        let validator = PhotoValidator::new(TEN_MB);
        for ct in ["image/jpeg", "image/png", "image/heic", "IMAGE/WebP", " image/gif "] {
            assert!(validator.validate_media_type(ct).is_ok(), "{ct}");
        }
    }

    #[test]
    fn test_rejects_non_images() {
        let validator = PhotoValidator::new(TEN_MB);
        for ct in ["application/pdf", "video/mp4", "text/plain", "", "image/", "imagery/png"] {
            assert!(
                matches!(
                    validator.validate_media_type(ct),
                    Err(ValidationError::InvalidMediaType { .. })
                ),
                "{ct}"
            );
        }
    }

    #[test]
    fn test_size_boundary() {
        let validator = PhotoValidator::new(TEN_MB);
        assert!(validator.validate_file_size(TEN_MB).is_ok());
        assert!(validator.validate_file_size(0).is_ok());
        assert_eq!(
            validator.validate_file_size(TEN_MB + 1),
            Err(ValidationError::FileTooLarge {
                size: TEN_MB + 1,
                max: TEN_MB
            })
        );
    }

    #[test]
    fn test_media_type_checked_before_size() {
        let validator = PhotoValidator::new(4);
        let source = SourceImage::new("notes.pdf", "application/pdf", vec![0; 16]);
        assert!(matches!(
            validator.validate(&source),
            Err(ValidationError::InvalidMediaType { .. })
        ));
    }
}
