//! Common test utilities for scribe-auth-core integration tests

use std::sync::Arc;

use scribe_auth_core::{AuthConfig, AuthService, Registration};
use scribe_db::memory::MemoryUserRepository;
use scribe_types::{MediaRef, Role};

pub const TEST_SECRET: &str = "integration-test-secret-key-32-bytes-min";

/// Auth service over an in-memory user store
#[allow(dead_code)]
pub fn test_service() -> (AuthService<MemoryUserRepository>, Arc<MemoryUserRepository>) {
    let repo = Arc::new(MemoryUserRepository::new());
    let config = AuthConfig::try_new(TEST_SECRET).unwrap();
    let service = AuthService::new(config, Arc::clone(&repo)).unwrap();
    (service, repo)
}

#[allow(dead_code)]
pub fn registration(email: &str, password: &str, role: Role) -> Registration {
    Registration {
        name: "Test User".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        phone: "+1 555 0100".to_string(),
        education: "MSc".to_string(),
        role,
    }
}

#[allow(dead_code)]
pub fn photo() -> MediaRef {
    MediaRef::new("users/photo-1", "https://media.test/users/photo-1.png")
}
