//! Signed session tokens
//!
//! HS256 JWTs carrying the user id as `sub`. Expiry is checked here rather
//! than by the decoder so the clock can be supplied by callers and the
//! boundary is exact (no leeway).

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use scribe_types::UserId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::AuthError;

/// Claims embedded in a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

impl SessionClaims {
    /// Parse the subject as a user id
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub).ok()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// A freshly signed token
#[derive(Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token issuer and verifier
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    /// Minimum secret length in bytes
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create an issuer, rejecting secrets shorter than 32 bytes
    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Result<Self, AuthError> {
        let secret = secret.as_ref();
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(AuthError::Configuration(format!(
                "token secret must be at least {} bytes",
                Self::MIN_SECRET_LENGTH
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for a user, valid from now
    pub fn issue(&self, user_id: UserId) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if signed at `now`
    pub fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let iat = now.timestamp();
        let exp = iat.saturating_add(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX));
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))?;

        Ok(IssuedToken {
            token,
            issued_at: DateTime::from_timestamp(iat, 0).unwrap_or(now),
            expires_at: DateTime::from_timestamp(exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC),
        })
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature and structure, then expiry relative to `now`.
    ///
    /// Signature failures win over expiry: a tampered token is always
    /// `InvalidToken` whatever `exp` it claims.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AuthError::InvalidToken
        })?;

        let claims = data.claims;
        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    const SECRET: &str = "test-secret-key-that-is-at-least-32-bytes";
    const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, WEEK).unwrap()
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(matches!(
            TokenIssuer::new("too-short", WEEK),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = issuer();
        let user = UserId::new();
        let issued = issuer.issue(user).unwrap();

        let claims = issuer.verify(&issued.token).unwrap();
        assert_eq!(claims.user_id(), Some(user));
        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn test_seven_day_window() {
        let issuer = issuer();
        let t = Utc::now();
        let issued = issuer.issue_at(UserId::new(), t).unwrap();

        assert!(issuer.verify_at(&issued.token, t + TimeDelta::days(6)).is_ok());
        assert!(issuer
            .verify_at(&issued.token, t + TimeDelta::days(7) - TimeDelta::seconds(1))
            .is_ok());
        assert!(matches!(
            issuer.verify_at(&issued.token, issued.expires_at),
            Err(AuthError::TokenExpired)
        ));
        assert!(matches!(
            issuer.verify_at(&issued.token, t + TimeDelta::days(8)),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = issuer().issue(UserId::new()).unwrap();
        let other = TokenIssuer::new("another-secret-key-that-is-32-bytes-long", WEEK).unwrap();
        assert!(matches!(other.verify(&issued.token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_payload_rejected_even_if_expired() {
        let issuer = issuer();
        let long_ago = Utc::now() - TimeDelta::days(30);
        let issued = issuer.issue_at(UserId::new(), long_ago).unwrap();

        let mut parts: Vec<String> = issued.token.split('.').map(String::from).collect();
        parts[1] = format!("{}A", parts[1]);
        let tampered = parts.join(".");

        assert!(matches!(issuer.verify(&tampered), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_rejected() {
        let issuer = issuer();
        assert!(matches!(issuer.verify(""), Err(AuthError::InvalidToken)));
        assert!(matches!(issuer.verify("a.b.c"), Err(AuthError::InvalidToken)));
    }
}
