//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// HTTP adapters for the recipe endpoint and image downloads.
pub mod http;
/// Image caching and loading.
pub mod image;

pub use config::{AppConfig, CliArgs, LogLevel};
pub use http::{HttpByteFetcher, RecipeClient};
pub use image::{
    CacheStats, DiskImageStore, ImageCache, ImageLoadedEvent, ImageLoader, LoaderConfig,
    MemoryImageStore,
};
