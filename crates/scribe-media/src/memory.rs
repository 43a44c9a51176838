//! In-memory media store for tests

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use scribe_types::MediaRef;

use crate::{MediaError, MediaStore};

/// Media store keeping uploads in memory
#[derive(Default, Clone)]
pub struct MemoryMediaStore {
    assets: Arc<DashMap<String, usize>>,
    failing: Arc<AtomicBool>,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail as if the host were down
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn contains(&self, storage_id: &str) -> bool {
        self.assets.contains_key(storage_id)
    }

    /// Number of stored assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    fn check(&self) -> Result<(), MediaError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MediaError::Provider("media host unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    fn provider(&self) -> &'static str {
        "memory"
    }

    async fn upload(&self, path: &Path) -> Result<MediaRef, MediaError> {
        self.check()?;
        let bytes = tokio::fs::read(path).await?;
        let storage_id = format!("memory/{}", uuid::Uuid::new_v4());
        let url = format!("https://media.test/{storage_id}");
        self.assets.insert(storage_id.clone(), bytes.len());
        Ok(MediaRef::new(storage_id, url))
    }

    async fn delete(&self, storage_id: &str) -> Result<(), MediaError> {
        self.check()?;
        self.assets.remove(storage_id);
        Ok(())
    }
}
