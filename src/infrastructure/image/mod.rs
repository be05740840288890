//! Image caching and loading infrastructure.
//!
//! This module provides:
//! - A shared decode/encode codec used by both the disk and network paths
//! - An in-memory store with LRU eviction
//! - A disk store persisting lossy-compressed bytes across sessions
//! - The two-tier cache composing both stores
//! - The async load coordinator sitting in front of the cache

pub mod cache;
pub mod codec;
pub mod disk_store;
pub mod loader;
pub mod memory_store;

pub use cache::ImageCache;
pub use disk_store::DiskImageStore;
pub use loader::{ImageLoadedEvent, ImageLoader, LoaderConfig};
pub use memory_store::{CacheStats, MemoryImageStore};
