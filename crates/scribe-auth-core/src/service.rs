//! Auth service - ties together credential storage, password hashing and session tokens

use scribe_db::{CreateUser, UserRepository};
use scribe_types::{MediaRef, PublicUser, Role, UserId};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    cookie::{SessionCookie, LEGACY_SESSION_COOKIE, SESSION_COOKIE},
    password::PasswordHasher,
    token::{IssuedToken, TokenIssuer},
    AuthError,
};

/// Registration request, already parsed from the wire
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub education: String,
    pub role: Role,
}

impl Registration {
    /// Check required fields and normalize the email in place
    pub fn validate(&mut self) -> Result<(), AuthError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("phone", &self.phone)?;
        require("education", &self.education)?;

        self.name = self.name.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self.education = self.education.trim().to_string();
        self.email = normalize_email(&self.email)?;
        Ok(())
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Login request
#[derive(Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl std::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// An authenticated user together with their new token
#[derive(Debug, Clone)]
pub struct Session {
    pub user: PublicUser,
    pub token: IssuedToken,
}

fn require(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Trim and lowercase an email, rejecting values that cannot be one
pub fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AuthError::Validation("please enter a valid email".to_string())),
    }
}

/// Authentication service
///
/// Provides unified interface for:
/// - Registration and login (credential checks, token issuance)
/// - Token authentication back to a stored user
/// - Session cookie directives
pub struct AuthService<U: UserRepository + ?Sized> {
    config: AuthConfig,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    user_repo: Arc<U>,
}

impl<U: UserRepository + ?Sized> AuthService<U> {
    /// Create a new auth service
    pub fn new(config: AuthConfig, user_repo: Arc<U>) -> Result<Self, AuthError> {
        let issuer = TokenIssuer::new(config.jwt_secret.as_bytes(), config.session_duration)?;
        Ok(Self {
            hasher: PasswordHasher::new(),
            issuer,
            user_repo,
            config,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Get the token issuer
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    // =========================================================================
    // Registration and Login
    // =========================================================================

    /// Fail with `DuplicateUser` if the email is already registered.
    ///
    /// Advisory only: the store's uniqueness constraint settles races in
    /// [`register`](Self::register).
    pub async fn ensure_email_available(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email)?;
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateUser);
        }
        Ok(())
    }

    /// Create an account and issue its first session
    pub async fn register(
        &self,
        registration: Registration,
        photo: MediaRef,
    ) -> Result<Session, AuthError> {
        let user = self.create_account(registration, photo).await?;
        let token = self.issue_session(user.id).await?;
        Ok(Session { user, token })
    }

    /// Validate, hash and persist a new account without issuing a session.
    ///
    /// Validation, hashing and insert failures all happen before a row
    /// exists, so the caller still owns `photo` when this returns `Err`.
    pub async fn create_account(
        &self,
        mut registration: Registration,
        photo: MediaRef,
    ) -> Result<PublicUser, AuthError> {
        registration.validate()?;

        let password_hash = self.hash_password(registration.password).await?;
        let row = self
            .user_repo
            .create(CreateUser {
                id: Uuid::new_v4(),
                email: registration.email,
                name: registration.name,
                password_hash,
                phone: registration.phone,
                education: registration.education,
                role: registration.role,
                photo,
            })
            .await?;

        let user = row.to_public()?;
        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Check credentials and claimed role, then issue a session
    pub async fn login(&self, credentials: LoginCredentials) -> Result<Session, AuthError> {
        require("email", &credentials.email)?;
        require("password", &credentials.password)?;
        let email = normalize_email(&credentials.email)?;

        let Some(row) = self.user_repo.find_by_email(&email).await? else {
            tracing::debug!("Login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .verify_password(credentials.password, row.password_hash.clone())
            .await?
        {
            tracing::debug!(user_id = %row.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let user = row.to_public()?;
        if user.role != credentials.role {
            tracing::debug!(user_id = %user.id, claimed = %credentials.role, "Login role mismatch");
            return Err(AuthError::RoleMismatch(credentials.role));
        }

        let token = self.issue_session(user.id).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(Session { user, token })
    }

    // =========================================================================
    // Token Authentication
    // =========================================================================

    /// Resolve a presented token to the user it was issued for
    pub async fn authenticate(&self, token: &str) -> Result<PublicUser, AuthError> {
        let claims = self.issuer.verify(token)?;
        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

        let row = self
            .user_repo
            .find_by_id(user_id.0)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(row.to_public()?)
    }

    /// Sign a token for the user and record it as their last issued token
    pub async fn issue_session(&self, user_id: UserId) -> Result<IssuedToken, AuthError> {
        let issued = self.issuer.issue(user_id)?;
        self.user_repo
            .update_last_token(user_id.0, &issued.token)
            .await?;
        Ok(issued)
    }

    // =========================================================================
    // Cookies
    // =========================================================================

    /// Cookie directive carrying an issued token
    pub fn session_cookie(&self, token: &IssuedToken) -> SessionCookie {
        SessionCookie::session(
            token.token.clone(),
            self.config.session_duration,
            self.config.secure_cookies,
        )
    }

    /// Directives clearing every cookie a token may live in
    pub fn logout_cookies(&self) -> [SessionCookie; 2] {
        [
            SessionCookie::cleared(SESSION_COOKIE, self.config.secure_cookies),
            SessionCookie::cleared(LEGACY_SESSION_COOKIE, self.config.secure_cookies),
        ]
    }

    // =========================================================================
    // Directory
    // =========================================================================

    /// All accounts with the admin role
    pub async fn list_admins(&self) -> Result<Vec<PublicUser>, AuthError> {
        self.user_repo
            .find_by_role(Role::Admin)
            .await?
            .iter()
            .map(|row| row.to_public().map_err(AuthError::from))
            .collect()
    }

    // Argon2 blocks for tens of milliseconds; run it on the blocking pool.
    async fn hash_password(&self, plaintext: String) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {e}")))?
    }

    async fn verify_password(&self, plaintext: String, hashed: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hashed))
            .await
            .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            name: " Ada ".into(),
            email: " Ada@Example.COM ".into(),
            password: "pw".into(),
            phone: "555".into(),
            education: "BSc".into(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_validate_normalizes() {
        let mut reg = registration();
        reg.validate().unwrap();
        assert_eq!(reg.email, "ada@example.com");
        assert_eq!(reg.name, "Ada");
    }

    #[test]
    fn test_validate_missing_field() {
        let mut reg = registration();
        reg.education = "  ".into();
        let err = reg.validate().unwrap_err();
        assert_eq!(err.to_string(), "education is required");
    }

    #[test]
    fn test_normalize_email_rejects_garbage() {
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("a@localhost").is_err());
        assert_eq!(normalize_email("A@B.io").unwrap(), "a@b.io");
    }

    #[test]
    fn test_debug_hides_password() {
        let reg = registration();
        assert!(!format!("{reg:?}").contains("pw"));
    }
}
