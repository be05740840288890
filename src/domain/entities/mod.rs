//! Domain entity definitions.

mod image;
mod recipe;

pub use image::{ImageKey, ImageStatus, LoadSource, LoadedImage};
pub use recipe::{Recipe, RecipeResponse};
