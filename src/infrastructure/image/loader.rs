//! Async image load coordinator.
//!
//! Serves requests cache-first with a network fallback, populating both cache
//! tiers before delivery. Results reach the UI through a single event channel
//! so presentation state only ever mutates on its own logical thread.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tokio::sync::{RwLock, Semaphore, mpsc};
use tracing::{debug, error, warn};

use crate::domain::entities::{ImageKey, LoadSource, LoadedImage};
use crate::domain::errors::CacheResult;
use crate::domain::ports::ByteFetcher;

use super::cache::ImageCache;
use super::codec;

/// Message sent when an image request reaches a terminal state.
#[derive(Debug, Clone)]
pub struct ImageLoadedEvent {
    /// Cache key of the requested image.
    pub key: ImageKey,
    /// The loaded image, or the failure message.
    pub result: Result<LoadedImage, String>,
}

/// Configuration for the image loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Maximum concurrent downloads.
    pub max_concurrent_downloads: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: 4,
        }
    }
}

/// Coordinates image loads across the cache and the network.
///
/// Two entry points: `load` awaits the result directly; `request` queues a
/// fire-and-forget load whose result arrives as an [`ImageLoadedEvent`].
/// Requests already in flight for the same key are not re-fetched on the
/// event path; concurrent direct `load` calls may race benignly, both writing
/// equivalent data to the cache.
pub struct ImageLoader {
    cache: Arc<ImageCache>,
    fetcher: Arc<dyn ByteFetcher>,
    in_flight: Arc<RwLock<HashSet<ImageKey>>>,
    request_tx: mpsc::UnboundedSender<LoadRequest>,
}

#[derive(Debug)]
struct LoadRequest {
    key: ImageKey,
    url: String,
}

/// State for the background worker loop.
struct WorkerState {
    cache: Arc<ImageCache>,
    fetcher: Arc<dyn ByteFetcher>,
    in_flight: Arc<RwLock<HashSet<ImageKey>>>,
    event_tx: mpsc::UnboundedSender<ImageLoadedEvent>,
    semaphore: Arc<Semaphore>,
    request_rx: mpsc::UnboundedReceiver<LoadRequest>,
}

impl ImageLoader {
    /// Creates a loader and spawns its worker loop.
    #[must_use]
    pub fn new(
        cache: Arc<ImageCache>,
        fetcher: Arc<dyn ByteFetcher>,
        config: &LoaderConfig,
        event_tx: &mpsc::UnboundedSender<ImageLoadedEvent>,
    ) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let in_flight = Arc::new(RwLock::new(HashSet::new()));

        let worker_state = WorkerState {
            cache: cache.clone(),
            fetcher: fetcher.clone(),
            in_flight: in_flight.clone(),
            event_tx: event_tx.clone(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_downloads.max(1))),
            request_rx,
        };

        tokio::spawn(Self::run_worker_loop(worker_state));

        Self {
            cache,
            fetcher,
            in_flight,
            request_tx,
        }
    }

    /// Worker loop handling queued requests under the download limit.
    async fn run_worker_loop(mut state: WorkerState) {
        let mut queue: VecDeque<LoadRequest> = VecDeque::new();

        loop {
            tokio::select! {
                request = state.request_rx.recv() => {
                    match request {
                        Some(request) => {
                            if !queue.iter().any(|queued| queued.key == request.key) {
                                queue.push_back(request);
                            }
                        }
                        None => break,
                    }
                }
                Ok(permit) = state.semaphore.clone().acquire_owned(), if !queue.is_empty() => {
                    if let Some(request) = queue.pop_front() {
                        let cache = state.cache.clone();
                        let fetcher = state.fetcher.clone();
                        let in_flight = state.in_flight.clone();
                        let event_tx = state.event_tx.clone();

                        tokio::spawn(async move {
                            {
                                let mut in_flight = in_flight.write().await;
                                if in_flight.contains(&request.key) {
                                    return;
                                }
                                in_flight.insert(request.key.clone());
                            }

                            let result = Self::load_for_key(&cache, &*fetcher, &request.key, &request.url)
                                .await
                                .map_err(|e| e.to_string());

                            in_flight.write().await.remove(&request.key);

                            if let Err(e) = &result {
                                warn!(key = %request.key, error = %e, "image load failed");
                            }
                            let _ = event_tx.send(ImageLoadedEvent {
                                key: request.key,
                                result,
                            });
                            drop(permit);
                        });
                    }
                }
            }
        }
    }

    /// Loads an image for `url`, cache first, network on miss.
    ///
    /// On a network load the cache is populated before the image is returned,
    /// so a follow-up request for the same URL is guaranteed a cache hit
    /// (modulo memory-tier eviction).
    ///
    /// # Errors
    /// Returns an error if the fetch or decode fails; no cache entry is
    /// created in that case.
    pub async fn load(&self, url: &str) -> CacheResult<LoadedImage> {
        let key = ImageKey::from_url(url);
        Self::load_for_key(&self.cache, &*self.fetcher, &key, url).await
    }

    async fn load_for_key(
        cache: &ImageCache,
        fetcher: &dyn ByteFetcher,
        key: &ImageKey,
        url: &str,
    ) -> CacheResult<LoadedImage> {
        if let Some((image, source)) = cache.get_by_key(key).await {
            return Ok(LoadedImage {
                key: key.clone(),
                image,
                source,
            });
        }

        debug!(key = %key, url = %url, "downloading image");
        let bytes = fetcher.fetch(url).await?;
        let image = codec::decode(bytes.to_vec()).await?;

        // Populate both tiers before delivering the result.
        cache.put_by_key(key.clone(), image.clone()).await;

        Ok(LoadedImage {
            key: key.clone(),
            image,
            source: LoadSource::Network,
        })
    }

    /// Queues a fire-and-forget load; the result arrives on the event channel.
    ///
    /// A key already queued or in flight is not fetched again.
    pub fn request(&self, key: ImageKey, url: String) {
        if let Err(e) = self.request_tx.send(LoadRequest { key, url }) {
            error!(error = %e, "failed to queue image load");
        }
    }

    /// Non-promoting memory-tier check for synchronous render paths.
    pub async fn check_memory(&self, key: &ImageKey) -> Option<Arc<image::DynamicImage>> {
        self.cache.memory().peek(key).await
    }

    /// Returns true if a load for `key` is currently in flight.
    pub async fn is_in_flight(&self, key: &ImageKey) -> bool {
        self.in_flight.read().await.contains(key)
    }

    /// Number of loads currently in flight.
    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.read().await.len()
    }
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::CacheError;
    use crate::infrastructure::image::{DiskImageStore, MemoryImageStore};
    use bytes::Bytes;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const URL: &str = "https://example.com/photos/small.jpg";

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(width, height);
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    /// Fetcher returning fixed bytes, counting calls.
    struct FixedFetcher {
        bytes: Vec<u8>,
        calls: AtomicUsize,
    }

    impl FixedFetcher {
        fn png(width: u32, height: u32) -> Self {
            Self {
                bytes: png_bytes(width, height),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ByteFetcher for FixedFetcher {
        async fn fetch(&self, _url: &str) -> CacheResult<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from(self.bytes.clone()))
        }
    }

    /// Fetcher that always fails.
    struct FailingFetcher;

    #[async_trait::async_trait]
    impl ByteFetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> CacheResult<Bytes> {
            Err(CacheError::network("connection refused"))
        }
    }

    /// Fetcher that blocks until permits are released, counting calls.
    struct GatedFetcher {
        bytes: Vec<u8>,
        gate: Semaphore,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ByteFetcher for GatedFetcher {
        async fn fetch(&self, _url: &str) -> CacheResult<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| CacheError::network(e.to_string()))?;
            Ok(Bytes::from(self.bytes.clone()))
        }
    }

    async fn create_cache() -> (Arc<ImageCache>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let disk = Arc::new(
            DiskImageStore::new(temp_dir.path().to_path_buf())
                .await
                .unwrap(),
        );
        let memory = Arc::new(MemoryImageStore::new(10));
        (Arc::new(ImageCache::new(memory, disk)), temp_dir)
    }

    #[tokio::test]
    async fn test_loader_starts_idle() {
        let (cache, _temp) = create_cache().await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let loader = ImageLoader::new(
            cache,
            Arc::new(FixedFetcher::png(10, 10)),
            &LoaderConfig::default(),
            &tx,
        );
        assert_eq!(loader.in_flight_count().await, 0);
    }

    #[tokio::test]
    async fn test_network_load_then_cache_hit() {
        let (cache, _temp) = create_cache().await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let fetcher = Arc::new(FixedFetcher::png(100, 100));
        let loader = ImageLoader::new(cache.clone(), fetcher.clone(), &LoaderConfig::default(), &tx);

        let loaded = loader.load(URL).await.unwrap();
        assert_eq!(loaded.source, LoadSource::Network);
        assert_eq!(loaded.image.width(), 100);
        assert_eq!(loaded.image.height(), 100);
        assert_eq!(fetcher.calls(), 1);

        // Second load is served from cache with no further fetcher calls.
        let again = loader.load(URL).await.unwrap();
        assert_eq!(again.source, LoadSource::Memory);
        assert_eq!(fetcher.calls(), 1);
        assert!(cache.get(URL).await.is_some());
    }

    #[tokio::test]
    async fn test_fetch_failure_creates_no_cache_entry() {
        let (cache, _temp) = create_cache().await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let loader = ImageLoader::new(
            cache.clone(),
            Arc::new(FailingFetcher),
            &LoaderConfig::default(),
            &tx,
        );

        let result = loader.load(URL).await;
        assert!(matches!(result, Err(CacheError::Network(_))));
        assert!(cache.get(URL).await.is_none());
        assert!(!cache.disk().contains(&ImageKey::from_url(URL)).await);
        assert_eq!(loader.in_flight_count().await, 0);
    }

    #[tokio::test]
    async fn test_undecodable_body_creates_no_cache_entry() {
        let (cache, _temp) = create_cache().await;
        let (tx, _rx) = mpsc::unbounded_channel();
        let fetcher = Arc::new(FixedFetcher {
            bytes: b"not an image".to_vec(),
            calls: AtomicUsize::new(0),
        });
        let loader = ImageLoader::new(cache.clone(), fetcher, &LoaderConfig::default(), &tx);

        let result = loader.load(URL).await;
        assert!(matches!(result, Err(CacheError::Decode(_))));
        assert!(cache.get(URL).await.is_none());
    }

    #[tokio::test]
    async fn test_event_path_delivers_and_caches() {
        let (cache, _temp) = create_cache().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let fetcher = Arc::new(FixedFetcher::png(100, 100));
        let loader = ImageLoader::new(cache.clone(), fetcher.clone(), &LoaderConfig::default(), &tx);

        let key = ImageKey::from_url(URL);
        loader.request(key.clone(), URL.to_string());

        let event = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.key, key);
        let loaded = event.result.unwrap();
        assert_eq!(loaded.image.width(), 100);
        assert_eq!(loaded.source, LoadSource::Network);
        assert!(cache.get(URL).await.is_some());
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_event_path_reports_failure() {
        let (cache, _temp) = create_cache().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let loader = ImageLoader::new(
            cache.clone(),
            Arc::new(FailingFetcher),
            &LoaderConfig::default(),
            &tx,
        );

        let key = ImageKey::from_url(URL);
        loader.request(key.clone(), URL.to_string());

        let event = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(event.result.is_err());
        assert!(cache.get(URL).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_fetch() {
        let (cache, _temp) = create_cache().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let fetcher = Arc::new(GatedFetcher {
            bytes: png_bytes(20, 20),
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        });
        let loader = ImageLoader::new(cache, fetcher.clone(), &LoaderConfig::default(), &tx);

        let key = ImageKey::from_url(URL);
        loader.request(key.clone(), URL.to_string());
        loader.request(key.clone(), URL.to_string());
        loader.request(key, URL.to_string());

        fetcher.gate.add_permits(8);

        let event = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(event.result.is_ok());
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }
}
