//! Scribe Auth Core - Authentication business logic
//!
//! Credential issuance, session-token lifecycle and role-gated access
//! decisions. HTTP concerns live in `scribe-axum` and the service crate.

pub mod config;
pub mod cookie;
pub mod error;
pub mod gate;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use cookie::{find_cookie, SameSite, SessionCookie, LEGACY_SESSION_COOKIE, SESSION_COOKIE};
pub use error::AuthError;
pub use gate::{authorize, RoleSet};
pub use password::PasswordHasher;
pub use service::{normalize_email, AuthService, LoginCredentials, Registration, Session};
pub use token::{IssuedToken, SessionClaims, TokenIssuer};
