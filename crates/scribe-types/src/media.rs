//! Media reference types

use serde::{Deserialize, Serialize};

/// Durable reference to an asset held by the media host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Provider-side identifier, used for deletion
    pub storage_id: String,
    /// Public HTTPS URL
    pub url: String,
}

impl MediaRef {
    pub fn new(storage_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            storage_id: storage_id.into(),
            url: url.into(),
        }
    }
}
