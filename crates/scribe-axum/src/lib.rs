//! Scribe Axum Integration
//!
//! Axum middleware and extractors for Scribe authentication.
//!
//! # Overview
//!
//! - **Middleware**: [`AuthenticateLayer`] resolves the session token on each
//!   request to a stored user and attaches an [`AuthContext`].
//! - **Authorization**: [`authorize`] builds a [`RoleGateLayer`] admitting
//!   only the listed roles. It must be mounted inside `AuthenticateLayer`.
//! - **Extractors**: [`RequireAuth`], [`MaybeAuth`], [`RequireAdmin`].
//!
//! # Quick Start
//!
//! ```ignore
//! use axum::{routing::post, Router};
//! use scribe_axum::{authorize, AuthenticateLayer, RequireAuth};
//! use scribe_types::Role;
//! use tower::ServiceBuilder;
//!
//! async fn create_blog(auth: RequireAuth) -> String {
//!     format!("Hello, {}!", auth.user.name)
//! }
//!
//! let app = Router::new()
//!     .route("/api/blogs", post(create_blog))
//!     .route_layer(
//!         ServiceBuilder::new()
//!             .layer(AuthenticateLayer::new(auth_service))
//!             .layer(authorize([Role::Admin])),
//!     );
//! ```
//!
//! Token lookup order: `session` cookie, legacy `jwt` cookie, then
//! `Authorization: Bearer`.

pub mod context;
pub mod error;
pub mod extractors;
pub mod layer;

pub use context::{AuthContext, AuthSource};
pub use error::AuthRejection;
pub use extractors::{AuthContextExt, MaybeAuth, RequireAdmin, RequireAuth};
pub use layer::{
    authorize, extract_token, AuthenticateLayer, AuthenticateService, Authenticator,
    RoleGateLayer, RoleGateService,
};
