//! User account handlers: register, login, logout, profile, admin directory

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use scribe_auth_core::{AuthError, LoginCredentials, Registration};
use scribe_axum::RequireAuth;
use scribe_types::{PublicUser, Role, UserSummary};

use crate::error::{ApiError, ApiResult};
use crate::handlers::cookie_headers;
use crate::state::AppState;
use crate::upload::UploadForm;

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: PublicUser,
    pub token: String,
}

/// Login request body. Fields are optional so absence is a 400, not a decode error.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: UserSummary,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn parse_role(raw: &str) -> Result<Role, ApiError> {
    raw.parse::<Role>()
        .map_err(|e| AuthError::Validation(e.to_string()).into())
}

/// POST /api/users/register
///
/// Multipart: `name, email, password, phone, education, role, photo`
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut form = UploadForm::read(multipart, "photo").await?;
    let photo = form.take_image("user photo")?;

    let (Some(name), Some(email), Some(password), Some(phone), Some(education), Some(role)) = (
        form.text("name"),
        form.text("email"),
        form.raw("password"),
        form.text("phone"),
        form.text("education"),
        form.text("role"),
    ) else {
        return Err(ApiError::BadRequest("please fill required fields".to_string()));
    };

    let mut registration = Registration {
        name,
        email,
        password,
        phone,
        education,
        role: parse_role(&role)?,
    };
    registration.validate()?;

    // Cheap pre-check so an obvious duplicate never costs an upload
    state.auth.ensure_email_available(&registration.email).await?;

    let media = match state.media.upload(photo.path()).await {
        Ok(media) => {
            metrics::counter!("scribe_media_uploads_total", "outcome" => "success").increment(1);
            media
        }
        Err(e) => {
            metrics::counter!("scribe_media_uploads_total", "outcome" => "failure").increment(1);
            return Err(e.into());
        }
    };

    let user = match state.auth.create_account(registration, media.clone()).await {
        Ok(user) => user,
        Err(e) => {
            // No row references the photo, so it would be orphaned
            if let Err(cleanup) = state.media.delete(&media.storage_id).await {
                tracing::warn!(error = %cleanup, storage_id = %media.storage_id, "Failed to delete orphaned photo");
            }
            return Err(e.into());
        }
    };

    metrics::counter!("scribe_registrations_total").increment(1);

    // From here the stored account owns the photo; failures leave it in place
    let token = state.auth.issue_session(user.id).await?;

    let headers = cookie_headers(&[state.auth.session_cookie(&token)])?;
    Ok((
        StatusCode::CREATED,
        headers,
        Json(RegisterResponse {
            message: "User registered successfully",
            user,
            token: token.token,
        }),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let (Some(email), Some(password), Some(role)) = (req.email, req.password, req.role) else {
        return Err(ApiError::BadRequest("please fill in all required fields".to_string()));
    };
    if email.trim().is_empty() || password.is_empty() || role.trim().is_empty() {
        return Err(ApiError::BadRequest("please fill in all required fields".to_string()));
    }

    let credentials = LoginCredentials {
        email,
        password,
        role: parse_role(&role)?,
    };

    let session = match state.auth.login(credentials).await {
        Ok(session) => {
            metrics::counter!("scribe_logins_total", "outcome" => "success").increment(1);
            session
        }
        Err(e) => {
            metrics::counter!("scribe_logins_total", "outcome" => e.error_code()).increment(1);
            return Err(e.into());
        }
    };

    let headers = cookie_headers(&[state.auth.session_cookie(&session.token)])?;
    Ok((
        StatusCode::OK,
        headers,
        Json(LoginResponse {
            message: "User logged in successfully",
            user: UserSummary::from(&session.user),
            token: session.token.token,
        }),
    ))
}

/// POST /api/users/logout
///
/// Clears the session cookies. Tokens are not revoked server-side.
pub async fn logout(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let headers = cookie_headers(&state.auth.logout_cookies())?;
    Ok((
        StatusCode::OK,
        headers,
        Json(MessageResponse {
            message: "User logged out successfully",
        }),
    ))
}

/// GET /api/users/profile
pub async fn profile(auth: RequireAuth) -> Json<PublicUser> {
    Json(auth.0.user)
}

/// GET /api/users/admins
pub async fn list_admins(State(state): State<AppState>) -> ApiResult<Json<Vec<PublicUser>>> {
    Ok(Json(state.auth.list_admins().await?))
}
