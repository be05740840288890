//! Port for fetching raw bytes over the network.

use bytes::Bytes;

use crate::domain::errors::CacheResult;

/// Fetches the raw bytes behind a URL.
///
/// A single attempt with no retry or backoff; one failed request surfaces
/// directly to the load coordinator. Implementations must be thread-safe.
#[async_trait::async_trait]
pub trait ByteFetcher: Send + Sync {
    /// Downloads the body for `url`, failing on any non-success status.
    async fn fetch(&self, url: &str) -> CacheResult<Bytes>;
}
