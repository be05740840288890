//! Port for fetching the recipe catalog.

use crate::domain::entities::Recipe;
use crate::domain::errors::FetchError;

/// Fetches the full recipe catalog from a remote source.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecipeSource: Send + Sync {
    /// Fetches all recipes. An empty catalog is an error.
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, FetchError>;
}
