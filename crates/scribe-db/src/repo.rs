//! Repository traits
//!
//! Define async repository interfaces for database operations.

use async_trait::async_trait;
use scribe_types::{MediaRef, Role, UserId};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// Credential store
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>>;

    /// Find a user by email (the unique identity)
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>>;

    /// Find all users with the given role
    async fn find_by_role(&self, role: Role) -> DbResult<Vec<UserRow>>;

    /// Create a new user
    ///
    /// Fails with [`DbError::UniqueViolation`](crate::DbError::UniqueViolation)
    /// when the email is already taken, including when another insert for the
    /// same email wins a race.
    async fn create(&self, user: CreateUser) -> DbResult<UserRow>;

    /// Overwrite the last issued token. Fails with `NotFound` if the user is missing.
    async fn update_last_token(&self, id: Uuid, token: &str) -> DbResult<()>;
}

/// Create user input
#[derive(Clone)]
pub struct CreateUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub phone: String,
    pub education: String,
    pub role: Role,
    pub photo: MediaRef,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Blog store
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Find a blog by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<BlogRow>>;

    /// All blogs, newest first
    async fn list_all(&self) -> DbResult<Vec<BlogRow>>;

    /// Blogs created by a user, newest first
    async fn list_by_creator(&self, user_id: Uuid) -> DbResult<Vec<BlogRow>>;

    /// Create a new blog
    async fn create(&self, blog: CreateBlog) -> DbResult<BlogRow>;

    /// Apply a partial update. Returns `None` when the blog does not exist.
    async fn update(&self, id: Uuid, patch: UpdateBlog) -> DbResult<Option<BlogRow>>;

    /// Delete a blog. Returns the deleted row, or `None` when it did not exist.
    async fn delete(&self, id: Uuid) -> DbResult<Option<BlogRow>>;
}

/// Create blog input
#[derive(Debug, Clone)]
pub struct CreateBlog {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub about: String,
    pub image: MediaRef,
    pub author_name: String,
    pub author_image: Option<String>,
    pub created_by: UserId,
}

/// Partial blog update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateBlog {
    pub title: Option<String>,
    pub category: Option<String>,
    pub about: Option<String>,
}

impl UpdateBlog {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.category.is_none() && self.about.is_none()
    }
}
