//! User types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MediaRef, Role};

/// Unique user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create a new random user ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// User as it may be shown to clients.
///
/// This is the only user shape that is ever serialized. It deliberately has
/// no field for the password hash or the last issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub education: String,
    pub role: Role,
    pub photo: MediaRef,
    pub created_at: DateTime<Utc>,
}

/// Minimal user summary returned from login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&PublicUser> for UserSummary {
    fn from(user: &PublicUser) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new();
        let parsed = UserId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(UserId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_public_user_json_has_no_secret_fields() {
        let user = PublicUser {
            id: UserId::new(),
            email: "a@x.com".to_string(),
            name: "Ada".to_string(),
            phone: "555-0100".to_string(),
            education: "BSc".to_string(),
            role: Role::Admin,
            photo: MediaRef::new("scribe/abc", "https://cdn.example.com/abc.png"),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("password_hash"));
        assert!(!obj.contains_key("last_token"));
        assert_eq!(obj["role"], "admin");
        assert_eq!(obj["id"], user.id.to_string());
    }
}
