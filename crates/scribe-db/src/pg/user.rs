//! PostgreSQL user repository implementation

use async_trait::async_trait;
use scribe_types::Role;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::UserRow;
use crate::repo::{CreateUser, UserRepository};

const USER_COLUMNS: &str = "id, email, name, password_hash, phone, education, role, \
                            photo_storage_id, photo_url, last_token, created_at, updated_at";

/// PostgreSQL user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_role(&self, role: Role) -> DbResult<Vec<UserRow>> {
        let users = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY created_at"
        ))
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn create(&self, user: CreateUser) -> DbResult<UserRow> {
        // The users_email_key constraint decides races; DbError::from maps
        // its violation to UniqueViolation.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, name, password_hash, phone, education, role,
                               photo_storage_id, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.education)
        .bind(user.role.as_str())
        .bind(&user.photo.storage_id)
        .bind(&user.photo.url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_last_token(&self, id: Uuid, token: &str) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE users SET last_token = $1, updated_at = NOW() WHERE id = $2")
                .bind(token)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }
}
