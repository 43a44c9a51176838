//! Tower middleware layers for authentication and role gating.
//!
//! [`AuthenticateLayer`] resolves the request's session token to a user.
//! [`RoleGateLayer`] (built with [`authorize`]) then admits or refuses the
//! request by role. Mount the gate inside the authenticate layer:
//!
//! ```ignore
//! router.route_layer(
//!     ServiceBuilder::new()
//!         .layer(AuthenticateLayer::new(auth))
//!         .layer(authorize([Role::Admin])),
//! )
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request};
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use tower::{Layer, Service};

use scribe_auth_core::{
    find_cookie, AuthError, AuthService, RoleSet, LEGACY_SESSION_COOKIE, SESSION_COOKIE,
};
use scribe_db::UserRepository;
use scribe_types::PublicUser;

use crate::context::{AuthContext, AuthSource};
use crate::error::AuthRejection;
use crate::extractors::AuthContextExt;

/// Resolves a presented token to the user it belongs to.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<PublicUser, AuthError>;
}

#[async_trait]
impl<U> Authenticator for AuthService<U>
where
    U: UserRepository + ?Sized + 'static,
{
    async fn authenticate(&self, token: &str) -> Result<PublicUser, AuthError> {
        AuthService::authenticate(self, token).await
    }
}

/// Extract the session token from a request.
///
/// Cookies win over the Authorization header, and `session` wins over `jwt`.
pub fn extract_token(headers: &HeaderMap) -> Option<(String, AuthSource)> {
    let cookies: Vec<&str> = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();

    for name in [SESSION_COOKIE, LEGACY_SESSION_COOKIE] {
        if let Some(token) = cookies.iter().find_map(|c| find_cookie(c, name)) {
            return Some((token.to_string(), AuthSource::Cookie));
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| (token.to_string(), AuthSource::BearerToken))
}

fn reject(err: AuthError) -> Response {
    let rejection = AuthRejection::from(err);
    metrics::counter!("scribe_auth_rejections_total", "code" => rejection.code).increment(1);
    rejection.into_response()
}

// ============================================================================
// Authentication
// ============================================================================

/// Tower layer that authenticates requests.
#[derive(Clone)]
pub struct AuthenticateLayer {
    authenticator: Arc<dyn Authenticator>,
}

impl AuthenticateLayer {
    #[must_use]
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }
}

impl<S> Layer<S> for AuthenticateLayer {
    type Service = AuthenticateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthenticateService {
            inner,
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

/// The authentication service.
#[derive(Clone)]
pub struct AuthenticateService<S> {
    inner: S,
    authenticator: Arc<dyn Authenticator>,
}

impl<S> Service<Request<Body>> for AuthenticateService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        // Keep the instance that was polled ready; leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let authenticator = Arc::clone(&self.authenticator);

        Box::pin(async move {
            let Some((token, source)) = extract_token(req.headers()) else {
                return Ok(reject(AuthError::Unauthenticated));
            };

            match authenticator.authenticate(&token).await {
                Ok(user) => {
                    tracing::debug!(user_id = %user.id, ?source, "Request authenticated");
                    req.extensions_mut()
                        .insert(AuthContextExt(AuthContext::new(user, source)));
                    inner.call(req).await
                }
                Err(err) => {
                    tracing::debug!(error = %err, "Authentication failed");
                    Ok(reject(err))
                }
            }
        })
    }
}

// ============================================================================
// Authorization
// ============================================================================

/// Build a gate admitting only the given roles.
pub fn authorize(roles: impl Into<RoleSet>) -> RoleGateLayer {
    RoleGateLayer {
        allowed: roles.into(),
    }
}

/// Tower layer that refuses requests whose user role is not allowed.
#[derive(Debug, Clone, Copy)]
pub struct RoleGateLayer {
    allowed: RoleSet,
}

impl RoleGateLayer {
    pub fn allowed(&self) -> RoleSet {
        self.allowed
    }
}

impl<S> Layer<S> for RoleGateLayer {
    type Service = RoleGateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RoleGateService {
            inner,
            allowed: self.allowed,
        }
    }
}

/// The role gate service.
#[derive(Clone)]
pub struct RoleGateService<S> {
    inner: S,
    allowed: RoleSet,
}

impl<S> Service<Request<Body>> for RoleGateService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let refusal = match req.extensions().get::<AuthContextExt>() {
            None => {
                tracing::error!(
                    path = %req.uri().path(),
                    "Role gate reached without authentication; is AuthenticateLayer mounted?"
                );
                Some(AuthRejection::missing_context().into_response())
            }
            Some(AuthContextExt(ctx)) => {
                scribe_auth_core::authorize(&self.allowed, ctx.role())
                    .err()
                    .map(|err| {
                        tracing::debug!(user_id = %ctx.user_id(), role = %ctx.role(), "Role refused");
                        reject(err)
                    })
            }
        };

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(async move {
            match refusal {
                Some(response) => Ok(response),
                None => inner.call(req).await,
            }
        })
    }
}
