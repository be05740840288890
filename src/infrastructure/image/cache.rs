//! Two-tier image cache composing the memory and disk stores.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{ImageKey, LoadSource};

use super::codec;
use super::disk_store::DiskImageStore;
use super::memory_store::MemoryImageStore;

/// Two-tier read/write cache keyed by source URL.
///
/// Reads short-circuit: a memory hit never touches the disk store. Disk hits
/// are promoted into memory so the next lookup stays in the fast tier. No
/// network access happens here.
///
/// Constructed once at application composition and shared by handle; there is
/// no hidden global instance.
pub struct ImageCache {
    memory: Arc<MemoryImageStore>,
    disk: Arc<DiskImageStore>,
}

impl ImageCache {
    /// Creates a cache over the given stores.
    #[must_use]
    pub fn new(memory: Arc<MemoryImageStore>, disk: Arc<DiskImageStore>) -> Self {
        Self { memory, disk }
    }

    /// Looks up the image for `url`.
    pub async fn get(&self, url: &str) -> Option<Arc<image::DynamicImage>> {
        self.get_by_key(&ImageKey::from_url(url))
            .await
            .map(|(img, _)| img)
    }

    /// Looks up an image by key, reporting which tier served it.
    pub async fn get_by_key(
        &self,
        key: &ImageKey,
    ) -> Option<(Arc<image::DynamicImage>, LoadSource)> {
        if let Some(img) = self.memory.get(key).await {
            return Some((img, LoadSource::Memory));
        }

        let img = self.disk.read_image(key).await?;
        // Promote so the next lookup stays in memory.
        self.memory.put(key.clone(), img.clone()).await;
        debug!(key = %key, "promoted disk entry into memory");
        Some((img, LoadSource::Disk))
    }

    /// Stores the image for `url` in both tiers.
    pub async fn put(&self, url: &str, image: Arc<image::DynamicImage>) {
        self.put_by_key(ImageKey::from_url(url), image).await;
    }

    /// Stores an image by key: memory synchronously, disk as a detached
    /// best-effort task. An encode or write failure leaves the entry served
    /// from memory only.
    pub async fn put_by_key(&self, key: ImageKey, image: Arc<image::DynamicImage>) {
        self.memory.put(key.clone(), image.clone()).await;

        let disk = self.disk.clone();
        tokio::spawn(async move {
            match codec::encode_jpeg(image).await {
                Ok(bytes) => {
                    if let Err(e) = disk.write(&key, &bytes).await {
                        warn!(key = %key, error = %e, "failed to persist image to disk");
                    }
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "failed to encode image for disk");
                }
            }
        });
    }

    /// The memory tier, for stats and instrumentation.
    #[must_use]
    pub fn memory(&self) -> &Arc<MemoryImageStore> {
        &self.memory
    }

    /// The disk tier, for stats and instrumentation.
    #[must_use]
    pub fn disk(&self) -> &Arc<DiskImageStore> {
        &self.disk
    }
}
