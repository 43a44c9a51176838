//! Configuration types for the auth service

use std::time::Duration;

use crate::AuthError;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for token signing
    pub jwt_secret: String,
    /// Session token lifetime
    pub session_duration: Duration,
    /// Mark cookies `Secure` (production-like environments)
    pub secure_cookies: bool,
}

impl AuthConfig {
    /// Minimum allowed secret length in bytes (256 bits)
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Default session lifetime: 7 days
    pub const DEFAULT_SESSION_DURATION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    /// Create a new auth config, validating the secret length
    pub fn try_new(jwt_secret: impl Into<String>) -> Result<Self, AuthError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(AuthError::Configuration(format!(
                "JWT secret too short: got {} bytes, need at least {}",
                jwt_secret.len(),
                Self::MIN_SECRET_LENGTH
            )));
        }
        Ok(Self {
            jwt_secret,
            session_duration: Self::DEFAULT_SESSION_DURATION,
            secure_cookies: false,
        })
    }

    /// Set session duration
    pub fn with_session_duration(mut self, duration: Duration) -> Self {
        self.session_duration = duration;
        self
    }

    /// Set whether cookies carry the `Secure` attribute
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_duration", &self.session_duration)
            .field("secure_cookies", &self.secure_cookies)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_rejected() {
        let result = AuthConfig::try_new("short");
        assert!(matches!(result, Err(AuthError::Configuration(_))));
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::try_new("k".repeat(32)).unwrap();
        assert_eq!(config.session_duration, Duration::from_secs(604_800));
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = AuthConfig::try_new("super-secret-value-that-is-long-enough").unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
