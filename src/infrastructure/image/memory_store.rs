//! In-memory LRU store for decoded images.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::domain::entities::ImageKey;

/// Default maximum number of decoded images held in memory.
pub const DEFAULT_MEMORY_CAPACITY: usize = 100;

/// In-memory LRU store for decoded images.
///
/// Eviction is an internal concern: callers must not assume an entry survives
/// between a `put` and a later `get`.
pub struct MemoryImageStore {
    entries: RwLock<LruCache<ImageKey, Arc<image::DynamicImage>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageStore {
    /// Creates a store holding at most `capacity` images.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(cap)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a store with the default capacity.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }

    /// Gets an image, marking it most recently used.
    pub async fn get(&self, key: &ImageKey) -> Option<Arc<image::DynamicImage>> {
        let mut entries = self.entries.write().await;
        if let Some(img) = entries.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "memory store hit");
            Some(img.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "memory store miss");
            None
        }
    }

    /// Stores an image, evicting the least recently used entry if full.
    pub async fn put(&self, key: ImageKey, image: Arc<image::DynamicImage>) {
        let mut entries = self.entries.write().await;
        debug!(key = %key, "storing image in memory store");
        entries.put(key, image);
    }

    /// Peeks at an image without promoting it in the LRU order.
    pub async fn peek(&self, key: &ImageKey) -> Option<Arc<image::DynamicImage>> {
        let entries = self.entries.read().await;
        entries.peek(key).cloned()
    }

    /// Returns the current number of cached images.
    ///
    /// Best-effort under concurrent modification.
    pub fn len(&self) -> usize {
        self.entries.try_read().map_or(0, |entries| entries.len())
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all entries.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
        debug!("cleared memory store");
    }

    /// Returns hit/miss statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
        }
    }
}

impl Default for MemoryImageStore {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Statistics about memory store performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of lookups served from memory.
    pub hits: u64,
    /// Number of lookups that missed.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} images, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.hit_rate, self.hits, self.misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> Arc<image::DynamicImage> {
        Arc::new(image::DynamicImage::new_rgb8(10, 10))
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryImageStore::new(10);
        let key = ImageKey::new("k1");

        store.put(key.clone(), test_image()).await;
        let retrieved = store.get(&key).await;

        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().width(), 10);
    }

    #[tokio::test]
    async fn test_miss_on_unknown_key() {
        let store = MemoryImageStore::new(10);
        assert!(store.get(&ImageKey::new("missing")).await.is_none());
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let store = MemoryImageStore::new(2);
        let (k1, k2, k3) = (
            ImageKey::new("k1"),
            ImageKey::new("k2"),
            ImageKey::new("k3"),
        );

        store.put(k1.clone(), test_image()).await;
        store.put(k2.clone(), test_image()).await;
        store.put(k3.clone(), test_image()).await;

        assert!(store.get(&k1).await.is_none());
        assert!(store.get(&k2).await.is_some());
        assert!(store.get(&k3).await.is_some());
    }

    #[tokio::test]
    async fn test_put_is_idempotent() {
        let store = MemoryImageStore::new(10);
        let key = ImageKey::new("k1");

        store.put(key.clone(), test_image()).await;
        store.put(key.clone(), test_image()).await;

        assert_eq!(store.len(), 1);
        assert!(store.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn test_peek_does_not_promote() {
        let store = MemoryImageStore::new(2);
        let (k1, k2, k3) = (
            ImageKey::new("k1"),
            ImageKey::new("k2"),
            ImageKey::new("k3"),
        );

        store.put(k1.clone(), test_image()).await;
        store.put(k2.clone(), test_image()).await;

        let _ = store.peek(&k1).await;
        store.put(k3, test_image()).await;

        assert!(store.peek(&k1).await.is_none());
    }

    #[tokio::test]
    async fn test_stats() {
        let store = MemoryImageStore::new(10);
        let key = ImageKey::new("k1");
        store.put(key.clone(), test_image()).await;

        let _ = store.get(&key).await;
        let _ = store.get(&ImageKey::new("missing")).await;

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }
}
