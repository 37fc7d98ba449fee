use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{FetchError, Fetcher};

/// Settings for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub user_agent: String,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: concat!("page-loader/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

/// `Fetcher` backed by a shared reqwest client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(options: &HttpOptions) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()?;

        Ok(Self { client })
    }
}

fn transport_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, e))?;

        debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}
