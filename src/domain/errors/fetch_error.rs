//! Recipe catalog fetch errors.

use thiserror::Error;

/// Errors surfaced by the recipe catalog fetch.
///
/// Unlike image loads, these are user visible: the list screen shows the
/// message with a retry affordance.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The endpoint URL could not be used for a request.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request failed before a response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("invalid server response (HTTP {status})")]
    InvalidResponse {
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// The response body could not be decoded as a recipe catalog.
    #[error("failed to decode data from server: {0}")]
    Decode(String),

    /// The catalog decoded successfully but contained no recipes.
    #[error("no recipes available")]
    Empty,
}

impl FetchError {
    /// Returns whether a retry could plausibly succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Request(_) | Self::InvalidResponse { .. } | Self::Empty
        )
    }
}
