//! Media gateway configuration

use std::time::Duration;

use crate::MediaError;

const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

/// Cloudinary account configuration
#[derive(Clone)]
pub struct CloudinaryConfig {
    /// Cloud (account) name
    pub cloud_name: String,
    /// API key
    pub api_key: String,
    /// API secret used to sign requests
    pub api_secret: String,
    /// API base URL (overridable for tests)
    pub api_base: String,
    /// Deadline for a whole upload request
    pub upload_timeout: Duration,
    /// Deadline for establishing a connection
    pub connect_timeout: Duration,
    /// Optional folder for uploaded assets
    pub folder: Option<String>,
}

impl CloudinaryConfig {
    /// Create a config, rejecting empty credentials
    pub fn try_new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, MediaError> {
        let config = Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_base: CLOUDINARY_API_BASE.to_string(),
            upload_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            folder: None,
        };

        for (name, value) in [
            ("cloud name", &config.cloud_name),
            ("api key", &config.api_key),
            ("api secret", &config.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(MediaError::Configuration(format!("cloudinary {name} is empty")));
            }
        }
        Ok(config)
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the upload deadline
    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Store assets under a folder
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Endpoint for an image action (`upload`, `destroy`)
    pub fn image_endpoint(&self, action: &str) -> String {
        format!("{}/v1_1/{}/image/{action}", self.api_base, self.cloud_name)
    }
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_base", &self.api_base)
            .field("upload_timeout", &self.upload_timeout)
            .field("folder", &self.folder)
            .finish_non_exhaustive()
    }
}
