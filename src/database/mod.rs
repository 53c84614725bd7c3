pub mod manager;
pub mod models;
pub mod query;
pub mod repository;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{AttributeRepository, NewRecipe, RecipeChanges, RecipeRepository, UserRepository};
