//! Scribe Media - Media upload gateway
//!
//! Hands image files to an external media host and gets back a stable
//! reference (`storage_id`, public `url`). Cloudinary is the production
//! host; an in-memory store is available behind the `test-utils` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use scribe_media::{CloudinaryConfig, CloudinaryStore, MediaStore};
//!
//! let config = CloudinaryConfig::try_new("demo", "key", "secret")?;
//! let store = CloudinaryStore::new(config)?;
//!
//! let media = store.upload(path).await?;
//! println!("{} -> {}", media.storage_id, media.url);
//! ```

pub mod cloudinary;
pub mod config;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod memory;
pub mod provider;
pub mod upload;

pub use cloudinary::CloudinaryStore;
pub use config::CloudinaryConfig;
pub use error::MediaError;
pub use provider::MediaStore;
pub use upload::{validate_image, ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES};

pub use scribe_types::MediaRef;
