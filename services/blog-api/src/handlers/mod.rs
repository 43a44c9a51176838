//! REST API handlers

pub mod blogs;
pub mod health;
pub mod users;

pub use blogs::*;
pub use health::*;
pub use users::*;

use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use scribe_auth_core::SessionCookie;

use crate::error::ApiError;

/// Headers carrying one or more `Set-Cookie` directives
pub(crate) fn cookie_headers(cookies: &[SessionCookie]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    for cookie in cookies {
        let value = HeaderValue::from_str(&cookie.to_header_value())
            .map_err(|e| ApiError::Internal(format!("invalid cookie header: {e}")))?;
        headers.append(SET_COOKIE, value);
    }
    Ok(headers)
}
