//! HTTP byte fetcher for image downloads.

use bytes::Bytes;

use crate::domain::errors::{CacheError, CacheResult};
use crate::domain::ports::ByteFetcher;

/// [`ByteFetcher`] backed by `reqwest`.
///
/// One attempt per call; the load coordinator treats any failure as terminal
/// for that request.
pub struct HttpByteFetcher {
    client: reqwest::Client,
}

impl HttpByteFetcher {
    /// Creates a fetcher with its own client and the given request timeout.
    ///
    /// # Errors
    /// Returns a network error if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64) -> CacheResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CacheError::network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Creates a fetcher sharing an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ByteFetcher for HttpByteFetcher {
    async fn fetch(&self, url: &str) -> CacheResult<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::network(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CacheError::network(format!("HTTP {}", response.status())));
        }

        response
            .bytes()
            .await
            .map_err(|e| CacheError::network(format!("failed to read body: {e}")))
    }
}
