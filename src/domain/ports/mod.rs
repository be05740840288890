//! Port definitions for external collaborators.

mod byte_fetcher_port;
mod recipe_source_port;

pub use byte_fetcher_port::ByteFetcher;
pub use recipe_source_port::RecipeSource;

#[cfg(test)]
pub use recipe_source_port::MockRecipeSource;
