//! PostgreSQL blog repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::BlogRow;
use crate::repo::{BlogRepository, CreateBlog, UpdateBlog};

const BLOG_COLUMNS: &str = "id, title, category, about, image_storage_id, image_url, \
                            author_name, author_image, created_by, created_at, updated_at";

/// PostgreSQL blog repository
#[derive(Clone)]
pub struct PgBlogRepository {
    pool: PgPool,
}

impl PgBlogRepository {
    /// Create a new blog repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogRepository for PgBlogRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<BlogRow>> {
        let blog = sqlx::query_as::<_, BlogRow>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blog)
    }

    async fn list_all(&self) -> DbResult<Vec<BlogRow>> {
        let blogs = sqlx::query_as::<_, BlogRow>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(blogs)
    }

    async fn list_by_creator(&self, user_id: Uuid) -> DbResult<Vec<BlogRow>> {
        let blogs = sqlx::query_as::<_, BlogRow>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE created_by = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(blogs)
    }

    async fn create(&self, blog: CreateBlog) -> DbResult<BlogRow> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            r#"
            INSERT INTO blogs (id, title, category, about, image_storage_id, image_url,
                               author_name, author_image, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(blog.id)
        .bind(&blog.title)
        .bind(&blog.category)
        .bind(&blog.about)
        .bind(&blog.image.storage_id)
        .bind(&blog.image.url)
        .bind(&blog.author_name)
        .bind(&blog.author_image)
        .bind(blog.created_by.0)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: UpdateBlog) -> DbResult<Option<BlogRow>> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            r#"
            UPDATE blogs
            SET title = COALESCE($2, title),
                category = COALESCE($3, category),
                about = COALESCE($4, about),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.category)
        .bind(&patch.about)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> DbResult<Option<BlogRow>> {
        let row = sqlx::query_as::<_, BlogRow>(&format!(
            "DELETE FROM blogs WHERE id = $1 RETURNING {BLOG_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
