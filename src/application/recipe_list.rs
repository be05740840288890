//! Recipe list loading state.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::Recipe;
use crate::domain::ports::RecipeSource;

/// Observable state of the recipe list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecipeListState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in progress.
    Loading,
    /// The catalog loaded.
    Loaded(Vec<Recipe>),
    /// The fetch failed; the message is shown with a retry affordance.
    Failed(String),
}

/// Drives the recipe list from a [`RecipeSource`].
pub struct RecipeList {
    source: Arc<dyn RecipeSource>,
    state: RecipeListState,
}

impl RecipeList {
    /// Creates a list over the given source.
    #[must_use]
    pub fn new(source: Arc<dyn RecipeSource>) -> Self {
        Self {
            source,
            state: RecipeListState::Idle,
        }
    }

    /// Fetches the catalog, replacing the current state.
    ///
    /// A failed refresh discards any previously loaded recipes; retry is a
    /// plain second call.
    pub async fn refresh(&mut self) {
        self.state = RecipeListState::Loading;
        match self.source.fetch_recipes().await {
            Ok(recipes) => {
                info!(count = recipes.len(), "recipe catalog loaded");
                self.state = RecipeListState::Loaded(recipes);
            }
            Err(e) => {
                warn!(error = %e, "recipe catalog fetch failed");
                self.state = RecipeListState::Failed(e.to_string());
            }
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &RecipeListState {
        &self.state
    }

    /// Loaded recipes, empty unless in the loaded state.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        match &self.state {
            RecipeListState::Loaded(recipes) => recipes,
            _ => &[],
        }
    }
}
