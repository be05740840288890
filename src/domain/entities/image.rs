//! Domain types for image loading and caching.

use std::sync::Arc;

/// Key addressing both cache tiers, derived from a source URL.
///
/// Stable across process restarts: the same URL always produces the same key,
/// so disk entries written in a previous session remain reachable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    /// Creates a key from a raw string. Mostly useful in tests.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derives a key from a URL by hashing its absolute string.
    ///
    /// SHA-256 truncated to 16 bytes and hex-encoded, so the key is well
    /// distributed and safe to use directly as a filename.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hasher.finalize();
        Self(hex::encode(&digest[..16]))
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of an image slot in the loading pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageStatus {
    /// Loading has not started.
    #[default]
    NotStarted,
    /// A request is in flight (cache check, download, or decode).
    Loading,
    /// Image is decoded and ready for display.
    Ready,
    /// Loading failed with an error message; the placeholder remains.
    Failed(String),
}

impl ImageStatus {
    /// Returns true if the image is ready for rendering.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns true if a request is currently in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if loading failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Where a loaded image was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Served from the in-memory store.
    Memory,
    /// Served from the disk store (and promoted into memory).
    Disk,
    /// Downloaded from the network.
    Network,
}

impl std::fmt::Display for LoadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Disk => write!(f, "disk"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// A decoded image together with its cache key and origin.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Cache key the image is stored under.
    pub key: ImageKey,
    /// The decoded image, shared between slots and the memory store.
    pub image: Arc<image::DynamicImage>,
    /// Which tier (or the network) served this load.
    pub source: LoadSource,
}
