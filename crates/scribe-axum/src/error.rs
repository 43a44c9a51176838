//! Rejection type for auth middleware and extractors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use scribe_auth_core::AuthError;

/// Error response body
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: AuthErrorDetail,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetail {
    code: &'static str,
    message: String,
}

/// Auth rejection rendered as `{"error": {"code", "message"}}`
#[derive(Debug, Clone)]
pub struct AuthRejection {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl AuthRejection {
    /// Gate reached without an authenticated context
    pub fn missing_context() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: "internal server error".to_string(),
        }
    }
}

impl From<AuthError> for AuthRejection {
    fn from(err: AuthError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if err.is_internal() {
            tracing::error!(error = %err, "Internal auth error");
            "internal server error".to_string()
        } else {
            err.to_string()
        };
        Self {
            status,
            code: err.error_code(),
            message,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = AuthErrorResponse {
            error: AuthErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_types::Role;

    #[test]
    fn test_from_auth_error() {
        let rejection = AuthRejection::from(AuthError::TokenExpired);
        assert_eq!(rejection.status, StatusCode::UNAUTHORIZED);
        assert_eq!(rejection.code, "TOKEN_EXPIRED");

        let rejection = AuthRejection::from(AuthError::Forbidden(Role::User));
        assert_eq!(rejection.status, StatusCode::FORBIDDEN);
        assert!(rejection.message.contains("user"));
    }

    #[test]
    fn test_internal_detail_hidden() {
        let rejection = AuthRejection::from(AuthError::Database("connection refused".into()));
        assert_eq!(rejection.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!rejection.message.contains("connection refused"));
    }
}
