//! Application layer: UI-facing state machines.

mod image_slot;
mod recipe_list;

pub use image_slot::ImageSlot;
pub use recipe_list::{RecipeList, RecipeListState};
