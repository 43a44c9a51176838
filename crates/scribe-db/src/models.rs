//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, Utc};
use scribe_types::{BlogId, BlogPost, MediaRef, PublicUser, Role, UserId};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// User row from the database
///
/// Holds the password hash, so it must never be serialized or logged.
/// Use [`UserRow::to_public`] for anything that leaves the process.
#[derive(Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub phone: String,
    pub education: String,
    pub role: String,
    pub photo_storage_id: String,
    pub photo_url: String,
    pub last_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Blog row from the database
#[derive(Debug, Clone, FromRow)]
pub struct BlogRow {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub about: String,
    pub image_storage_id: String,
    pub image_url: String,
    pub author_name: String,
    pub author_image: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    /// Parse the stored role
    pub fn role(&self) -> DbResult<Role> {
        self.role
            .parse()
            .map_err(|_| DbError::InvalidRow(format!("user {} has unknown role", self.id)))
    }

    /// Safe projection without the password hash or last token
    pub fn to_public(&self) -> DbResult<PublicUser> {
        Ok(PublicUser {
            id: self.user_id(),
            email: self.email.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            education: self.education.clone(),
            role: self.role()?,
            photo: MediaRef::new(&self.photo_storage_id, &self.photo_url),
            created_at: self.created_at,
        })
    }
}

impl std::fmt::Debug for UserRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRow")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl BlogRow {
    /// Convert to domain BlogId
    pub fn blog_id(&self) -> BlogId {
        BlogId(self.id)
    }

    /// Convert to the domain blog post
    pub fn into_post(self) -> BlogPost {
        BlogPost {
            id: BlogId(self.id),
            title: self.title,
            category: self.category,
            about: self.about,
            image: MediaRef::new(self.image_storage_id, self.image_url),
            author_name: self.author_name,
            author_image: self.author_image,
            created_by: UserId(self.created_by),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
