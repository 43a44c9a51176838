//! Auth errors

use scribe_types::Role;
use thiserror::Error;

/// Authentication and authorization errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Identity already registered
    #[error("user already registered with this email")]
    DuplicateUser,

    /// Unknown email or wrong password
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Login claimed a role the account does not have
    #[error("role {0} does not match")]
    RoleMismatch(Role),

    /// No token presented
    #[error("user not authenticated, please login")]
    Unauthenticated,

    /// Invalid token (malformed, bad signature, etc.)
    #[error("invalid token, please login again")]
    InvalidToken,

    /// Token has expired
    #[error("token expired, please login again")]
    TokenExpired,

    /// Token subject does not resolve to a user
    #[error("user not found, please login")]
    UserNotFound,

    /// Role not permitted for the resource
    #[error("role ({0}) is not authorized to access this resource")]
    Forbidden(Role),

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::DuplicateUser
            | Self::InvalidCredentials
            | Self::RoleMismatch(_) => 400,
            Self::Unauthenticated | Self::InvalidToken | Self::TokenExpired | Self::UserNotFound => {
                401
            }
            Self::Forbidden(_) => 403,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DuplicateUser => "DUPLICATE_USER",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::RoleMismatch(_) => "ROLE_MISMATCH",
            Self::Unauthenticated => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for failures that are the server's fault
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<scribe_db::DbError> for AuthError {
    fn from(err: scribe_db::DbError) -> Self {
        match err {
            scribe_db::DbError::UniqueViolation(_) => Self::DuplicateUser,
            other => {
                tracing::error!("Database error: {}", other);
                Self::Database(other.to_string())
            }
        }
    }
}
