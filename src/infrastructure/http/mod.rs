//! HTTP adapters.

mod fetcher;
mod recipe_client;

pub use fetcher::HttpByteFetcher;
pub use recipe_client::{DEFAULT_RECIPES_URL, RecipeClient};
