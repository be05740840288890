//! Recipe catalog entities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recipe from the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Stable identifier assigned by the catalog.
    #[serde(rename = "uuid")]
    pub id: Uuid,

    /// Recipe name.
    pub name: String,

    /// Cuisine the recipe belongs to.
    pub cuisine: String,

    /// Thumbnail-sized photo URL.
    #[serde(default)]
    pub photo_url_small: Option<String>,

    /// Full-size photo URL.
    #[serde(default)]
    pub photo_url_large: Option<String>,

    /// Link to the original recipe page.
    #[serde(default)]
    pub source_url: Option<String>,

    /// Link to a video walkthrough.
    #[serde(default)]
    pub youtube_url: Option<String>,
}

impl Recipe {
    /// URL to use for list thumbnails, falling back to the large photo.
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.photo_url_small
            .as_deref()
            .or(self.photo_url_large.as_deref())
    }

    /// URL to use for the detail view, falling back to the small photo.
    #[must_use]
    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url_large
            .as_deref()
            .or(self.photo_url_small.as_deref())
    }
}

/// Top-level payload returned by the recipes endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// All recipes in the catalog.
    pub recipes: Vec<Recipe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "recipes": [
            {
                "cuisine": "Malaysian",
                "name": "Apam Balik",
                "photo_url_large": "https://example.com/apam/large.jpg",
                "photo_url_small": "https://example.com/apam/small.jpg",
                "source_url": "https://example.com/apam-balik",
                "uuid": "0c6ca6e7-e32a-4053-b824-1dbf749910d8",
                "youtube_url": "https://www.youtube.com/watch?v=6R8ffRRJcrg"
            },
            {
                "cuisine": "British",
                "name": "Bakewell Tart",
                "uuid": "eed6005f-f8c8-451f-98d0-4088e2b40eb6"
            }
        ]
    }"#;

    #[test]
    fn test_decode_full_and_sparse_recipes() {
        let response: RecipeResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(response.recipes.len(), 2);

        let apam = &response.recipes[0];
        assert_eq!(apam.name, "Apam Balik");
        assert_eq!(apam.cuisine, "Malaysian");
        assert_eq!(
            apam.thumbnail_url(),
            Some("https://example.com/apam/small.jpg")
        );
        assert_eq!(
            apam.photo_url(),
            Some("https://example.com/apam/large.jpg")
        );

        let tart = &response.recipes[1];
        assert_eq!(tart.thumbnail_url(), None);
        assert_eq!(tart.source_url, None);
    }

    #[test]
    fn test_thumbnail_falls_back_to_large() {
        let json = r#"{
            "cuisine": "French",
            "name": "Crepes",
            "uuid": "74f6d4eb-da50-4901-94d1-deae2d8af1d1",
            "photo_url_large": "https://example.com/crepes/large.jpg"
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(
            recipe.thumbnail_url(),
            Some("https://example.com/crepes/large.jpg")
        );
    }

    #[test]
    fn test_missing_required_field_fails() {
        let json = r#"{"cuisine": "French", "uuid": "74f6d4eb-da50-4901-94d1-deae2d8af1d1"}"#;
        assert!(serde_json::from_str::<Recipe>(json).is_err());
    }
}
