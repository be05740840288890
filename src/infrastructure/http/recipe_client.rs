//! Recipe catalog client.

use crate::domain::entities::{Recipe, RecipeResponse};
use crate::domain::errors::FetchError;
use crate::domain::ports::RecipeSource;

/// Production recipe catalog endpoint.
pub const DEFAULT_RECIPES_URL: &str = "https://d3jbb8n5wk0qxi.cloudfront.net/recipes.json";

/// [`RecipeSource`] backed by `reqwest` against a JSON endpoint.
pub struct RecipeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RecipeClient {
    /// Creates a client for the given endpoint.
    #[must_use]
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Creates a client for the production endpoint.
    #[must_use]
    pub fn with_default_endpoint(client: reqwest::Client) -> Self {
        Self::new(client, DEFAULT_RECIPES_URL)
    }
}

#[async_trait::async_trait]
impl RecipeSource for RecipeClient {
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::InvalidResponse {
                status: status.as_u16(),
            });
        }

        let decoded: RecipeResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        if decoded.recipes.is_empty() {
            return Err(FetchError::Empty);
        }

        Ok(decoded.recipes)
    }
}
