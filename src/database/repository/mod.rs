//! Owner-scoped data access. Every query that touches recipes, tags or
//! ingredients carries the requesting user's id, so rows owned by someone
//! else behave exactly like rows that do not exist.

pub mod attribute;
pub mod recipe;
pub mod user;

pub use attribute::AttributeRepository;
pub use recipe::{NewRecipe, RecipeChanges, RecipeRepository};
pub use user::UserRepository;

/// Map a unique-constraint violation onto a field conflict, pass anything else through
pub(crate) fn conflict_on_unique(
    err: sqlx::Error,
    field: &'static str,
    message: &str,
) -> super::DatabaseError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => super::DatabaseError::Conflict {
            field,
            message: message.to_string(),
        },
        _ => super::DatabaseError::Sqlx(err),
    }
}
