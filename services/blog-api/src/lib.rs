//! Scribe Blog API
//!
//! Blog backend: account registration and login with session cookies, and
//! role-gated blog publishing with images held by an external media host.
//!
//! ## REST Endpoints
//!
//! - `POST /api/users/register` - Create an account (multipart, with photo)
//! - `POST /api/users/login` - Log in with email, password and role
//! - `POST /api/users/logout` - Clear session cookies
//! - `GET /api/users/profile` - Current user (authenticated)
//! - `GET /api/users/admins` - Admin directory (authenticated)
//! - `POST /api/blogs` - Create a blog (admin, multipart)
//! - `GET /api/blogs` - All blogs (authenticated)
//! - `GET /api/blogs/mine` - Caller's blogs (admin)
//! - `GET /api/blogs/{id}` - One blog (authenticated)
//! - `PUT /api/blogs/{id}` - Update a blog (admin)
//! - `DELETE /api/blogs/{id}` - Delete a blog (admin)
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
pub mod upload;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use scribe_axum::{authorize, AuthenticateLayer, Authenticator};
use scribe_media::MAX_IMAGE_BYTES;
use scribe_types::Role;

use crate::handlers::{health, ready};
use crate::state::AppState;

/// Multipart overhead allowed on top of the image limit
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the HTTP router
pub fn build_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let request_timeout = state.request_timeout();
    let authenticator: Arc<dyn Authenticator> = state.auth.clone();
    let authenticate = AuthenticateLayer::new(authenticator);
    let admin_only = ServiceBuilder::new()
        .layer(authenticate.clone())
        .layer(authorize([Role::Admin]));

    // User routes
    let user_public = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout));
    let user_authenticated = Router::new()
        .route("/profile", get(handlers::profile))
        .route("/admins", get(handlers::list_admins))
        .route_layer(authenticate.clone());

    // Blog routes
    let blog_read = Router::new()
        .route("/", get(handlers::list_blogs))
        .route("/{id}", get(handlers::get_blog))
        .route_layer(authenticate);
    let blog_admin = Router::new()
        .route("/", post(handlers::create_blog))
        .route("/mine", get(handlers::my_blogs))
        .route(
            "/{id}",
            axum::routing::put(handlers::update_blog).delete(handlers::delete_blog),
        )
        .route_layer(admin_only);

    // Health routes (no timeout - must always respond quickly)
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    // Metrics route (no timeout)
    let metrics_route = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    // Build middleware stack (order matters - outermost first)
    let middleware = ServiceBuilder::new()
        // Request ID propagation (outermost)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        // Tracing with request details
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // CORS (credentialed, so the origin must be explicit)
        .layer(cors_layer(&state.config.cors_origin))
        // Request timeout (innermost - closest to handler)
        .layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .nest("/api/users", user_public.merge(user_authenticated))
        .nest("/api/blogs", blog_read.merge(blog_admin))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES as usize + FORM_OVERHEAD_BYTES))
        .layer(middleware)
        .merge(health_routes)
        .merge(metrics_route)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match HeaderValue::from_str(origin) {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            tracing::warn!(origin, "Invalid CORS origin, cross-origin requests disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Install the Prometheus recorder and describe the service counters
pub fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    metrics::describe_counter!(
        "scribe_registrations_total",
        "Total accounts registered"
    );
    metrics::describe_counter!("scribe_logins_total", "Login attempts by outcome");
    metrics::describe_counter!(
        "scribe_auth_rejections_total",
        "Requests refused by the auth middleware, by error code"
    );
    metrics::describe_counter!(
        "scribe_media_uploads_total",
        "Media host uploads by outcome"
    );

    Ok(handle)
}
