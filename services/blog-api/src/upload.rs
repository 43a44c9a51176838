//! Multipart form reading
//!
//! Text fields are collected in memory; the single image field is streamed
//! to a temporary file so the media host client can read it by path. The
//! temp file is removed when the [`SpooledImage`] is dropped.

use std::collections::HashMap;

use axum::extract::multipart::{Field, Multipart};
use scribe_media::{validate_image, MediaError, MAX_IMAGE_BYTES};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

use crate::error::{ApiError, ApiResult};

/// Image received in a multipart form, spooled to disk
#[derive(Debug)]
pub struct SpooledImage {
    pub file: NamedTempFile,
    pub content_type: Option<String>,
    pub size: u64,
}

impl SpooledImage {
    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

/// Parsed multipart form
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    image: Option<SpooledImage>,
}

impl UploadForm {
    /// Read every part, spooling the part named `image_field`
    pub async fn read(mut multipart: Multipart, image_field: &str) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            if name == image_field {
                form.image = Some(spool(field).await?);
            } else if !name.is_empty() {
                let value = field.text().await.map_err(bad_multipart)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Text field, trimmed; `None` when absent or blank
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Raw text field, untrimmed (passwords)
    pub fn raw(&self, name: &str) -> Option<String> {
        self.fields.get(name).filter(|v| !v.is_empty()).cloned()
    }

    /// Take the validated image, failing if it is absent or unacceptable
    pub fn take_image(&mut self, field_label: &str) -> Result<SpooledImage, MediaError> {
        let image = self
            .image
            .take()
            .ok_or_else(|| MediaError::Missing(field_label.to_string()))?;
        validate_image(image.content_type.as_deref(), image.size)?;
        Ok(image)
    }
}

async fn spool(mut field: Field<'_>) -> ApiResult<SpooledImage> {
    let content_type = field.content_type().map(str::to_string);

    let file = NamedTempFile::new().map_err(|e| ApiError::Internal(e.to_string()))?;
    let mut writer = tokio::fs::File::from_std(
        file.reopen()
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    );

    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(bad_multipart)? {
        size += chunk.len() as u64;
        if size > MAX_IMAGE_BYTES {
            return Err(MediaError::TooLarge {
                size,
                limit_mib: MAX_IMAGE_BYTES >> 20,
            }
            .into());
        }
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    }
    writer
        .flush()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(SpooledImage {
        file,
        content_type,
        size,
    })
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("invalid multipart body: {}", err.body_text()))
}
