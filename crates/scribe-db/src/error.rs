//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// Insert rejected by a uniqueness constraint
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Stored row could not be mapped to a domain value
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// Migration failure
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return Self::UniqueViolation(constraint);
            }
        }
        Self::Sqlx(err)
    }
}

/// Result alias for repository operations
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_error_display() {
        let err = DbError::UniqueViolation("users_email_key".to_string());
        assert_eq!(err.to_string(), "unique constraint violated: users_email_key");
    }
}
