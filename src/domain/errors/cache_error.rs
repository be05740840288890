//! Errors for the image cache and load pipeline.

use thiserror::Error;

/// Result type for cache and image-load operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors that can occur while caching or loading an image.
///
/// A plain cache miss is never an error; absence is modeled with `Option`.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// Failed to decode bytes into an image.
    #[error("decode error: {0}")]
    Decode(String),
    /// Failed to encode an image for disk persistence.
    #[error("encode error: {0}")]
    Encode(String),
    /// I/O error during a cache operation.
    #[error("io error: {0}")]
    Io(String),
    /// Network error during download.
    #[error("network error: {0}")]
    Network(String),
}

impl CacheError {
    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates an encode error.
    #[must_use]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode(message.into())
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}
