//! Image upload validation

use crate::MediaError;

/// Accepted image content types
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpg", "image/jpeg", "image/png"];

/// Maximum image size (5 MiB)
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Check an incoming image before it is sent to the media host
pub fn validate_image(content_type: Option<&str>, size: u64) -> Result<(), MediaError> {
    let allowed = content_type
        .map(|ct| ct.trim().to_ascii_lowercase())
        .is_some_and(|ct| ALLOWED_IMAGE_TYPES.contains(&ct.as_str()));
    if !allowed {
        return Err(MediaError::UnsupportedFormat(content_type.map(String::from)));
    }

    if size == 0 {
        return Err(MediaError::Missing("image content".to_string()));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(MediaError::TooLarge {
            size,
            limit_mib: MAX_IMAGE_BYTES >> 20,
        });
    }
    Ok(())
}
