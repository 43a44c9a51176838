//! Router-level tests for the authenticate and role-gate layers

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use chrono::{TimeDelta, Utc};
use http_body_util::BodyExt;
use scribe_auth_core::{AuthConfig, AuthService, Registration};
use scribe_axum::{authorize, AuthenticateLayer, Authenticator, MaybeAuth, RequireAdmin, RequireAuth};
use scribe_db::memory::MemoryUserRepository;
use scribe_types::{MediaRef, Role, UserId};
use serde_json::Value;
use tower::{ServiceBuilder, ServiceExt};

const SECRET: &str = "middleware-test-secret-at-least-32-bytes";

type Service = AuthService<MemoryUserRepository>;

fn service() -> Arc<Service> {
    let config = AuthConfig::try_new(SECRET).unwrap();
    Arc::new(AuthService::new(config, Arc::new(MemoryUserRepository::new())).unwrap())
}

async fn token_for(service: &Service, email: &str, role: Role) -> (UserId, String) {
    let registration = Registration {
        name: "Tess".into(),
        email: email.into(),
        password: "pw".into(),
        phone: "555".into(),
        education: "BA".into(),
        role,
    };
    let session = service
        .register(registration, MediaRef::new("p", "https://media.test/p"))
        .await
        .unwrap();
    (session.user.id, session.token.token)
}

async fn whoami(auth: RequireAuth) -> String {
    auth.user.email.clone()
}

async fn admin_only(admin: RequireAdmin) -> String {
    admin.user.name.clone()
}

async fn greet(auth: MaybeAuth) -> String {
    match auth.0 {
        Some(ctx) => ctx.user.email,
        None => "guest".to_string(),
    }
}

fn app(service: Arc<Service>) -> Router {
    let authenticator: Arc<dyn Authenticator> = service;
    let authenticated = Router::new()
        .route("/me", get(whoami))
        .route_layer(AuthenticateLayer::new(Arc::clone(&authenticator)));

    let admin = Router::new()
        .route("/admin", get(whoami))
        .route_layer(
            ServiceBuilder::new()
                .layer(AuthenticateLayer::new(authenticator))
                .layer(authorize([Role::Admin])),
        );

    // Gate mounted without authentication: a wiring mistake
    let misconfigured = Router::new()
        .route("/broken", get(whoami))
        .route_layer(authorize([Role::Admin]));

    Router::new()
        .route("/greet", get(greet))
        .route("/extractor-admin", get(admin_only))
        .merge(authenticated)
        .merge(admin)
        .merge(misconfigured)
}

fn request(uri: &str, header: Option<(header::HeaderName, String)>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some((name, value)) = header {
        builder = builder.header(name, value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn error_code(body: &[u8]) -> String {
    let json: Value = serde_json::from_slice(body).unwrap();
    json["error"]["code"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_missing_token() {
    let app = app(service());
    let (status, body) = send(&app, request("/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "MISSING_TOKEN");
}

#[tokio::test]
async fn test_cookie_and_bearer_accepted() {
    let service = service();
    let (_, token) = token_for(&service, "u@x.io", Role::User).await;
    let app = app(service);

    for header in [
        (header::COOKIE, format!("session={token}")),
        (header::COOKIE, format!("jwt={token}")),
        (header::AUTHORIZATION, format!("Bearer {token}")),
    ] {
        let (status, body) = send(&app, request("/me", Some(header))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"u@x.io");
    }
}

#[tokio::test]
async fn test_invalid_token() {
    let app = app(service());
    let (status, body) = send(
        &app,
        request("/me", Some((header::COOKIE, "session=not.a.token".into()))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "INVALID_TOKEN");
}

#[tokio::test]
async fn test_expired_token() {
    let service = service();
    let (user_id, _) = token_for(&service, "u@x.io", Role::User).await;
    let stale = service
        .issuer()
        .issue_at(user_id, Utc::now() - TimeDelta::days(8))
        .unwrap();
    let app = app(service);

    let (status, body) = send(
        &app,
        request("/me", Some((header::AUTHORIZATION, format!("Bearer {}", stale.token)))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_token_for_unknown_user() {
    let service = service();
    let orphan = service.issuer().issue(UserId::new()).unwrap();
    let app = app(service);

    let (status, body) = send(
        &app,
        request("/me", Some((header::COOKIE, format!("session={}", orphan.token)))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_role_gate() {
    let service = service();
    let (_, user_token) = token_for(&service, "u@x.io", Role::User).await;
    let (_, admin_token) = token_for(&service, "a@x.io", Role::Admin).await;
    let app = app(service);

    let (status, body) = send(
        &app,
        request("/admin", Some((header::COOKIE, format!("session={user_token}")))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["code"], "FORBIDDEN");
    assert!(json["error"]["message"].as_str().unwrap().contains("user"));

    let (status, body) = send(
        &app,
        request("/admin", Some((header::COOKIE, format!("session={admin_token}")))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"a@x.io");
}

#[tokio::test]
async fn test_gate_rejects_unauthenticated_before_role_check() {
    let app = app(service());
    let (status, body) = send(&app, request("/admin", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "MISSING_TOKEN");
}

#[tokio::test]
async fn test_gate_without_authentication_fails_closed() {
    let service = service();
    let (_, admin_token) = token_for(&service, "a@x.io", Role::Admin).await;
    let app = app(service);

    let (status, body) = send(
        &app,
        request("/broken", Some((header::COOKIE, format!("session={admin_token}")))),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_code(&body), "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_extractors_without_layer() {
    let app = app(service());

    let (status, body) = send(&app, request("/greet", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"guest");

    let (status, body) = send(&app, request("/extractor-admin", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "MISSING_TOKEN");
}
