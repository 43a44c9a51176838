//! Blog types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MediaRef, UserId};

/// Unique blog identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlogId(pub Uuid);

impl BlogId {
    /// Create a new random blog ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a blog ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for BlogId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BlogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for BlogId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A published blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: BlogId,
    pub title: String,
    pub category: String,
    pub about: String,
    pub image: MediaRef,
    /// Display name of the author at publication time
    pub author_name: String,
    /// Author photo URL at publication time
    pub author_image: Option<String>,
    /// Back-reference used to scope "my blogs"; not an ownership lock
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
