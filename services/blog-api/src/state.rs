//! Application state for the Blog API service.

use scribe_auth_core::AuthService;
use scribe_db::{BlogRepository, DbPool, UserRepository};
use scribe_media::MediaStore;
use std::sync::Arc;

use crate::config::Config;

/// Auth service over whichever user store the process runs with
pub type SharedAuth = Arc<AuthService<dyn UserRepository>>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Auth service (register, login, token resolution)
    pub auth: SharedAuth,
    /// Blog store
    pub blogs: Arc<dyn BlogRepository>,
    /// Media host
    pub media: Arc<dyn MediaStore>,
    /// Database pool for readiness checks; absent for in-memory stores
    pub pool: Option<DbPool>,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        auth: AuthService<dyn UserRepository>,
        blogs: Arc<dyn BlogRepository>,
        media: Arc<dyn MediaStore>,
        pool: Option<DbPool>,
        config: Config,
    ) -> Self {
        Self {
            auth: Arc::new(auth),
            blogs,
            media,
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
