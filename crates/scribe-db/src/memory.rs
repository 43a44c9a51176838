//! In-memory repositories
//!
//! Used by tests and local runs without PostgreSQL. Email uniqueness is
//! enforced through the index map's entry API, so concurrent creates for the
//! same email behave like the `users_email_key` constraint: one wins, the
//! rest get [`DbError::UniqueViolation`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use scribe_types::Role;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::{BlogRow, UserRow};
use crate::repo::{BlogRepository, CreateBlog, CreateUser, UpdateBlog, UserRepository};

/// In-memory user repository
#[derive(Default, Clone)]
pub struct MemoryUserRepository {
    users: Arc<DashMap<Uuid, UserRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        let Some(id) = self.by_email.get(email).map(|r| *r.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_role(&self, role: Role) -> DbResult<Vec<UserRow>> {
        let mut users: Vec<UserRow> = self
            .users
            .iter()
            .filter(|r| r.value().role == role.as_str())
            .map(|r| r.value().clone())
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        let now = Utc::now();
        let row = UserRow {
            id: user.id,
            email: user.email.clone(),
            name: user.name,
            password_hash: user.password_hash,
            phone: user.phone,
            education: user.education,
            role: user.role.as_str().to_string(),
            photo_storage_id: user.photo.storage_id,
            photo_url: user.photo.url,
            last_token: None,
            created_at: now,
            updated_at: now,
        };

        match self.by_email.entry(user.email) {
            Entry::Occupied(_) => Err(DbError::UniqueViolation("users_email_key".to_string())),
            Entry::Vacant(slot) => {
                self.users.insert(row.id, row.clone());
                slot.insert(row.id);
                Ok(row)
            }
        }
    }

    async fn update_last_token(&self, id: Uuid, token: &str) -> DbResult<()> {
        let mut user = self.users.get_mut(&id).ok_or(DbError::NotFound)?;
        user.last_token = Some(token.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }
}

/// In-memory blog repository
#[derive(Default, Clone)]
pub struct MemoryBlogRepository {
    blogs: Arc<DashMap<Uuid, BlogRow>>,
}

impl MemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut rows: Vec<BlogRow>) -> Vec<BlogRow> {
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

#[async_trait]
impl BlogRepository for MemoryBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<BlogRow>> {
        Ok(self.blogs.get(&id).map(|r| r.value().clone()))
    }

    async fn list_all(&self) -> DbResult<Vec<BlogRow>> {
        let rows = self.blogs.iter().map(|r| r.value().clone()).collect();
        Ok(Self::newest_first(rows))
    }

    async fn list_by_creator(&self, user_id: Uuid) -> DbResult<Vec<BlogRow>> {
        let rows = self
            .blogs
            .iter()
            .filter(|r| r.value().created_by == user_id)
            .map(|r| r.value().clone())
            .collect();
        Ok(Self::newest_first(rows))
    }

    async fn create(&self, blog: CreateBlog) -> DbResult<BlogRow> {
        let now = Utc::now();
        let row = BlogRow {
            id: blog.id,
            title: blog.title,
            category: blog.category,
            about: blog.about,
            image_storage_id: blog.image.storage_id,
            image_url: blog.image.url,
            author_name: blog.author_name,
            author_image: blog.author_image,
            created_by: blog.created_by.0,
            created_at: now,
            updated_at: now,
        };
        self.blogs.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: UpdateBlog) -> DbResult<Option<BlogRow>> {
        let Some(mut blog) = self.blogs.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            blog.title = title;
        }
        if let Some(category) = patch.category {
            blog.category = category;
        }
        if let Some(about) = patch.about {
            blog.about = about;
        }
        blog.updated_at = Utc::now();
        Ok(Some(blog.clone()))
    }

    async fn delete(&self, id: Uuid) -> DbResult<Option<BlogRow>> {
        Ok(self.blogs.remove(&id).map(|(_, row)| row))
    }
}
