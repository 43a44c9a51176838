//! Common test utilities for blog-api router tests

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use blog_api::build_router;
use blog_api::config::Config;
use blog_api::state::AppState;
use scribe_auth_core::AuthConfig;
use scribe_db::memory::{MemoryBlogRepository, MemoryUserRepository};
use scribe_db::{BlogRepository, UserRepository};
use scribe_media::memory::MemoryMediaStore;
use scribe_media::CloudinaryConfig;

pub const TEST_SECRET: &str = "blog-api-test-secret-of-at-least-32-bytes";
const BOUNDARY: &str = "scribe-test-boundary-7MA4YWxkTrZu0gW";

/// Router over in-memory stores, plus handles to inspect them
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<MemoryUserRepository>,
    pub blogs: Arc<MemoryBlogRepository>,
    pub media: Arc<MemoryMediaStore>,
}

pub fn test_config() -> Config {
    Config {
        http_port: 0,
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
        app_env: "test".to_string(),
        auth: AuthConfig::try_new(TEST_SECRET).unwrap(),
        cloudinary: CloudinaryConfig::try_new("test", "key", "secret").unwrap(),
        request_timeout: Duration::from_secs(10),
        cors_origin: "http://localhost:3001".to_string(),
        metrics_enabled: false,
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_stores(|users| users, |blogs| blogs)
    }

    /// Build the app with the memory stores wrapped, e.g. to inject faults.
    /// The returned handles still point at the underlying memory stores.
    pub fn with_stores(
        wrap_users: impl FnOnce(Arc<dyn UserRepository>) -> Arc<dyn UserRepository>,
        wrap_blogs: impl FnOnce(Arc<dyn BlogRepository>) -> Arc<dyn BlogRepository>,
    ) -> Self {
        let config = test_config();
        let users = Arc::new(MemoryUserRepository::new());
        let blogs = Arc::new(MemoryBlogRepository::new());
        let media = Arc::new(MemoryMediaStore::new());

        let user_store: Arc<dyn UserRepository> = users.clone();
        let blog_store: Arc<dyn BlogRepository> = blogs.clone();
        let user_store = wrap_users(user_store);
        let blog_store = wrap_blogs(blog_store);
        let auth = scribe_auth_core::AuthService::new(config.auth.clone(), user_store).unwrap();
        let state = AppState::new(auth, blog_store, media.clone(), None, config);
        let router = build_router(state.clone(), None);

        Self {
            router,
            state,
            users,
            blogs,
            media,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            json,
        }
    }

    /// Register an account and return its token
    pub async fn register(&self, email: &str, role: &str) -> String {
        let res = self.send(registration_form(email, "s3cret", role).build("/api/users/register")).await;
        assert_eq!(res.status, StatusCode::CREATED, "register failed: {}", res.json);
        res.json["token"].as_str().unwrap().to_string()
    }
}

#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn error_code(&self) -> &str {
        self.json["error"]["code"].as_str().unwrap_or_default()
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }
}

/// Hand-built multipart/form-data body
pub struct MultipartForm {
    body: Vec<u8>,
}

#[allow(dead_code)]
impl MultipartForm {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"upload.bin\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn build(self, uri: &str) -> Request<Body> {
        self.build_with_cookie(uri, None)
    }

    pub fn build_with_cookie(mut self, uri: &str, token: Option<&str>) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        let mut builder = Request::post(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("session={token}"));
        }
        builder.body(Body::from(self.body)).unwrap()
    }
}

#[allow(dead_code)]
pub fn registration_form(email: &str, password: &str, role: &str) -> MultipartForm {
    MultipartForm::new()
        .text("name", "Test Person")
        .text("email", email)
        .text("password", password)
        .text("phone", "+1 555 0100")
        .text("education", "BSc")
        .text("role", role)
        .file("photo", "image/png", b"fake png bytes")
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("session={token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[allow(dead_code)]
pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    empty_request("GET", uri, token)
}

#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("session={token}"));
    }
    builder.body(Body::empty()).unwrap()
}
