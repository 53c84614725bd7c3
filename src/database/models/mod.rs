pub mod attribute;
pub mod recipe;
pub mod user;

pub use attribute::Attribute;
pub use recipe::{Recipe, RecipeRow, RecipeWithAttributes, RecipeWithIds};
pub use user::{NewUser, User};
