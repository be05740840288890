//! Disk store persisting encoded image bytes across sessions.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace, warn};

use crate::domain::entities::ImageKey;
use crate::domain::errors::{CacheError, CacheResult};

use super::codec;

/// Disk store holding one lossy-encoded file per cache key.
///
/// Every failure on the read path degrades to a miss and every failure on the
/// write path degrades to "not cached on disk"; the disk tier is an
/// optimization, never a correctness dependency. Entries are neither expired
/// nor size-bounded.
pub struct DiskImageStore {
    cache_dir: PathBuf,
    read_attempts: AtomicU64,
    read_hits: AtomicU64,
}

impl DiskImageStore {
    /// Creates a store rooted at `cache_dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an I/O error if the directory cannot be created.
    pub async fn new(cache_dir: PathBuf) -> CacheResult<Self> {
        fs::create_dir_all(&cache_dir)
            .await
            .map_err(|e| CacheError::io(format!("failed to create cache dir: {e}")))?;
        Ok(Self {
            cache_dir,
            read_attempts: AtomicU64::new(0),
            read_hits: AtomicU64::new(0),
        })
    }

    /// Creates a store in the per-user cache area.
    ///
    /// # Errors
    /// Returns an I/O error if the directory cannot be created.
    pub async fn default_location() -> CacheResult<Self> {
        Self::new(default_cache_dir()).await
    }

    /// Returns the file path for a key.
    fn entry_path(&self, key: &ImageKey) -> PathBuf {
        self.cache_dir.join(format!("{}.img", key.as_str()))
    }

    /// Reads stored bytes for `key`. Any I/O failure is a miss.
    pub async fn read(&self, key: &ImageKey) -> Option<Vec<u8>> {
        self.read_attempts.fetch_add(1, Ordering::Relaxed);
        let path = self.entry_path(key);
        match fs::read(&path).await {
            Ok(bytes) => {
                self.read_hits.fetch_add(1, Ordering::Relaxed);
                trace!(key = %key, path = %path.display(), "disk store hit");
                Some(bytes)
            }
            Err(_) => {
                trace!(key = %key, "disk store miss");
                None
            }
        }
    }

    /// Reads and decodes an image for `key`. Decode failure is a miss.
    pub async fn read_image(&self, key: &ImageKey) -> Option<Arc<image::DynamicImage>> {
        let bytes = self.read(key).await?;
        match codec::decode(bytes).await {
            Ok(img) => {
                debug!(key = %key, "decoded image from disk store");
                Some(img)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "failed to decode stored image");
                None
            }
        }
    }

    /// Writes encoded bytes for `key`.
    ///
    /// Best-effort: callers swallow the error with a warning. If the cache
    /// directory disappeared after construction this fails softly too.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be created or written.
    pub async fn write(&self, key: &ImageKey, bytes: &[u8]) -> CacheResult<()> {
        let path = self.entry_path(key);

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| CacheError::io(format!("failed to create cache file: {e}")))?;
        file.write_all(bytes)
            .await
            .map_err(|e| CacheError::io(format!("failed to write cache file: {e}")))?;
        file.flush()
            .await
            .map_err(|e| CacheError::io(format!("failed to flush cache file: {e}")))?;

        debug!(key = %key, path = %path.display(), size = bytes.len(), "stored image on disk");
        Ok(())
    }

    /// Checks whether an entry exists for `key`.
    pub async fn contains(&self, key: &ImageKey) -> bool {
        fs::try_exists(&self.entry_path(key)).await.unwrap_or(false)
    }

    /// Number of reads attempted, hit or miss.
    ///
    /// Lets tests observe that memory-tier hits never reach the disk tier.
    #[must_use]
    pub fn read_attempts(&self) -> u64 {
        self.read_attempts.load(Ordering::Relaxed)
    }

    /// Number of reads that found a file.
    #[must_use]
    pub fn read_hits(&self) -> u64 {
        self.read_hits.load(Ordering::Relaxed)
    }
}

/// Returns the default image cache directory.
fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "forkful", "forkful").map_or_else(
        || std::env::temp_dir().join("forkful").join("images"),
        |dirs| dirs.cache_dir().join("images"),
    )
}
