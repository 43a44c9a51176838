//! Media errors

use thiserror::Error;

/// Media gateway errors
#[derive(Error, Debug)]
pub enum MediaError {
    /// No file was supplied
    #[error("{0} is required")]
    Missing(String),

    /// Content type outside the allowed set
    #[error("invalid image format. Only jpg, jpeg, and png are allowed")]
    UnsupportedFormat(Option<String>),

    /// File larger than the limit
    #[error("image size exceeds the {limit_mib}MB limit")]
    TooLarge {
        /// Size of the rejected file
        size: u64,
        /// Limit in MiB
        limit_mib: u64,
    },

    /// Local file could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Media host rejected or failed the request
    #[error("provider error: {0}")]
    Provider(String),

    /// Media host did not answer in time
    #[error("media upload timed out")]
    Timeout,

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl MediaError {
    /// Whether the caller supplied a bad file (as opposed to an upstream failure)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Missing(_) | Self::UnsupportedFormat(_) | Self::TooLarge { .. }
        )
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Provider(err.to_string())
        }
    }
}
