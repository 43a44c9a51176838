//! Cloudinary media host implementation

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, error, instrument};

use scribe_types::MediaRef;

use crate::config::CloudinaryConfig;
use crate::error::MediaError;
use crate::provider::MediaStore;

/// Upload response (fields we use)
#[derive(Debug, Deserialize)]
pub struct CloudinaryUpload {
    pub public_id: String,
    pub secure_url: String,
}

/// Destroy response
#[derive(Debug, Deserialize)]
pub struct CloudinaryDestroy {
    pub result: String,
}

/// Cloudinary media store
#[derive(Clone)]
pub struct CloudinaryStore {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryStore {
    /// Create a new Cloudinary store
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(config.upload_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| MediaError::Configuration(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CloudinaryConfig {
        &self.config
    }

    /// Sign request parameters: hex SHA-256 over `k=v` pairs sorted by key,
    /// joined with `&`, followed by the API secret.
    pub fn sign(&self, params: &[(&str, &str)]) -> String {
        sign_params(params, &self.config.api_secret)
    }

    /// Send a request and decode a JSON body
    async fn cloudinary_request<T: for<'de> Deserialize<'de>>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, MediaError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Cloudinary request failed");
            MediaError::from_reqwest(e)
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Cloudinary API error");
            return Err(MediaError::Provider(format!("Cloudinary API error: {status}")));
        }

        response.json::<T>().await.map_err(|e| {
            error!(error = %e, "Failed to parse Cloudinary response");
            MediaError::Provider(e.to_string())
        })
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    fn provider(&self) -> &'static str {
        "cloudinary"
    }

    #[instrument(skip(self), fields(cloud = %self.config.cloud_name))]
    async fn upload(&self, path: &Path) -> Result<MediaRef, MediaError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        debug!(size = bytes.len(), "Uploading image");

        let timestamp = Self::timestamp();
        let mut params: Vec<(&str, &str)> = vec![("timestamp", timestamp.as_str())];
        if let Some(folder) = &self.config.folder {
            params.push(("folder", folder.as_str()));
        }
        let signature = self.sign(&params);

        let mut form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
            .part("file", Part::bytes(bytes).file_name(file_name));
        if let Some(folder) = &self.config.folder {
            form = form.text("folder", folder.clone());
        }

        let request = self
            .client
            .post(self.config.image_endpoint("upload"))
            .multipart(form);
        let uploaded: CloudinaryUpload = self.cloudinary_request(request).await?;

        debug!(public_id = %uploaded.public_id, "Image uploaded");
        Ok(MediaRef::new(uploaded.public_id, uploaded.secure_url))
    }

    #[instrument(skip(self))]
    async fn delete(&self, storage_id: &str) -> Result<(), MediaError> {
        let timestamp = Self::timestamp();
        let signature = self.sign(&[
            ("public_id", storage_id),
            ("timestamp", timestamp.as_str()),
        ]);

        let form = [
            ("public_id", storage_id),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("signature", signature.as_str()),
            ("signature_algorithm", "sha256"),
        ];
        let request = self
            .client
            .post(self.config.image_endpoint("destroy"))
            .form(&form);
        let destroyed: CloudinaryDestroy = self.cloudinary_request(request).await?;

        match destroyed.result.as_str() {
            "ok" => Ok(()),
            "not found" => {
                debug!(storage_id, "Image already absent");
                Ok(())
            }
            other => Err(MediaError::Provider(format!("destroy returned {other}"))),
        }
    }
}

fn sign_params(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
