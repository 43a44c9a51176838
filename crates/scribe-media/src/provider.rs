//! Media host abstraction

use std::path::Path;

use async_trait::async_trait;
use scribe_types::MediaRef;

use crate::MediaError;

/// Media host trait
///
/// Abstracts image hosting so services can run against Cloudinary in
/// production and an in-memory store in tests.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Short provider name, reported by readiness checks
    fn provider(&self) -> &'static str;

    /// Upload the file at `path` and return its stored reference
    async fn upload(&self, path: &Path) -> Result<MediaRef, MediaError>;

    /// Delete a previously uploaded asset
    async fn delete(&self, storage_id: &str) -> Result<(), MediaError>;
}
