//! Configuration for the Blog API service.

use std::time::Duration;

use scribe_auth_core::AuthConfig;
use scribe_media::CloudinaryConfig;

/// Blog API configuration
#[derive(Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL
    pub database_url: String,
    /// Database pool size
    pub database_max_connections: u32,
    /// Deployment environment (`production` enables secure cookies)
    pub app_env: String,
    /// Auth core configuration
    pub auth: AuthConfig,
    /// Media host configuration
    pub cloudinary: CloudinaryConfig,
    /// Request timeout
    pub request_timeout: Duration,
    /// Browser origin allowed by CORS
    pub cors_origin: String,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // Database
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections = var_or("DATABASE_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|_| ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"))?;

        // Server
        let http_port = var_or("HTTP_PORT", "8080")
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;
        let app_env = var_or("APP_ENV", "development");

        // Sessions
        let jwt_secret = lookup("JWT_SECRET_KEY").ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;
        let session_days: u64 = var_or("SESSION_DURATION_DAYS", "7")
            .parse()
            .map_err(|_| ConfigError::Invalid("SESSION_DURATION_DAYS"))?;
        if session_days == 0 {
            return Err(ConfigError::Invalid("SESSION_DURATION_DAYS"));
        }
        let auth = AuthConfig::try_new(jwt_secret)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_session_duration(Duration::from_secs(session_days * 24 * 60 * 60))
            .with_secure_cookies(app_env == "production");

        // Media host
        let cloud_name =
            lookup("CLOUDINARY_CLOUD_NAME").ok_or(ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?;
        let api_key =
            lookup("CLOUDINARY_API_KEY").ok_or(ConfigError::Missing("CLOUDINARY_API_KEY"))?;
        let api_secret =
            lookup("CLOUDINARY_API_SECRET").ok_or(ConfigError::Missing("CLOUDINARY_API_SECRET"))?;
        let upload_timeout_secs: u64 = var_or("UPLOAD_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|_| ConfigError::Invalid("UPLOAD_TIMEOUT_SECS"))?;
        let cloudinary = CloudinaryConfig::try_new(cloud_name, api_key, api_secret)
            .map_err(|e| ConfigError::MediaConfig(e.to_string()))?
            .with_upload_timeout(Duration::from_secs(upload_timeout_secs));

        // Request timeout
        let request_timeout_secs: u64 = var_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:3001");

        // Metrics
        let metrics_enabled = var_or("METRICS_ENABLED", "true").parse().unwrap_or(true);

        Ok(Self {
            http_port,
            database_url,
            database_max_connections,
            app_env,
            auth,
            cloudinary,
            request_timeout: Duration::from_secs(request_timeout_secs),
            cors_origin,
            metrics_enabled,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("http_port", &self.http_port)
            .field("app_env", &self.app_env)
            .field("auth", &self.auth)
            .field("cloudinary", &self.cloudinary)
            .field("request_timeout", &self.request_timeout)
            .field("cors_origin", &self.cors_origin)
            .field("metrics_enabled", &self.metrics_enabled)
            .finish_non_exhaustive()
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid auth configuration: {0}")]
    AuthConfig(String),

    #[error("Invalid media configuration: {0}")]
    MediaConfig(String),
}
