//! Authentication context types.
//!
//! The [`AuthContext`] struct carries the authenticated user into handlers.

use scribe_types::{PublicUser, Role, UserId};

/// Where the session token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// `session` or legacy `jwt` cookie.
    Cookie,
    /// Bearer token from Authorization header.
    BearerToken,
}

/// Authentication context for the current request.
///
/// Populated by [`AuthenticateLayer`](crate::AuthenticateLayer); never
/// contains credential material.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated user.
    pub user: PublicUser,
    /// Source of the authentication.
    pub source: AuthSource,
}

impl AuthContext {
    #[must_use]
    pub fn new(user: PublicUser, source: AuthSource) -> Self {
        Self { user, source }
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Check if user has admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}
