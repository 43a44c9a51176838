//! Axum extractors for authentication and authorization.
//!
//! These read the context attached by [`AuthenticateLayer`](crate::AuthenticateLayer).
//!
//! # Usage
//!
//! ```ignore
//! use scribe_axum::{MaybeAuth, RequireAdmin, RequireAuth};
//!
//! // Requires authentication (401 if not authenticated)
//! async fn profile(auth: RequireAuth) -> String {
//!     format!("Hello, {}!", auth.user.name)
//! }
//!
//! // Requires the admin role (403 otherwise)
//! async fn my_blogs(admin: RequireAdmin) -> String {
//!     admin.user.id.to_string()
//! }
//!
//! // Optional authentication
//! async fn greet(auth: MaybeAuth) -> String {
//!     match auth.0 {
//!         Some(ctx) => format!("Hello, {}!", ctx.user.name),
//!         None => "Hello, guest!".to_string(),
//!     }
//! }
//! ```

use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use scribe_auth_core::{authorize, AuthError, RoleSet};
use scribe_types::Role;

use crate::context::AuthContext;
use crate::error::AuthRejection;

/// Extension key for storing auth context in request extensions.
#[derive(Debug, Clone)]
pub struct AuthContextExt(pub AuthContext);

fn context_from(parts: &Parts) -> Option<AuthContext> {
    parts
        .extensions
        .get::<AuthContextExt>()
        .cloned()
        .map(|ext| ext.0)
}

/// Extractor that requires authentication.
///
/// Returns 401 Unauthorized if no valid authentication is present.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthContext);

impl Deref for RequireAuth {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context_from(parts)
            .map(Self)
            .ok_or_else(|| AuthError::Unauthenticated.into())
    }
}

/// Extractor for optional authentication.
///
/// Returns `None` if no authentication is present, rather than failing.
#[derive(Debug, Clone)]
pub struct MaybeAuth(pub Option<AuthContext>);

impl Deref for MaybeAuth {
    type Target = Option<AuthContext>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(context_from(parts)))
    }
}

/// Extractor that requires the admin role.
///
/// Returns 401 if not authenticated and 403 for any other role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthContext);

impl Deref for RequireAdmin {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = context_from(parts).ok_or(AuthError::Unauthenticated)?;
        authorize(&RoleSet::only(Role::Admin), ctx.role())?;
        Ok(Self(ctx))
    }
}
