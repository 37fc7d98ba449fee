pub mod http;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub use http::{HttpFetcher, HttpOptions};

/// Failure to retrieve a single URL
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("{url} responded with {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },
}

impl FetchError {
    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Capability to retrieve the body behind a URL.
///
/// Used for the root page and for every asset. Implementations make a single
/// attempt; callers decide what a failure means.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}
