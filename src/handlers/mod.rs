pub mod context;
pub mod recipe;

pub use context::RequestContext;
pub use recipe::{RecipeRequest, handle_recipe};
