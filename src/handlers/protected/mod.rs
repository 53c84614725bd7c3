// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here runs behind jwt_auth_middleware and validate_user_middleware,
// and receives the caller as `Extension<ValidatedUser>`. All data access is
// scoped to that user.

pub mod attribute;
pub mod recipe;
pub mod recipe_image;
pub mod user;

use crate::error::ApiError;

/// Path id; anything that is not an integer cannot name a row
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::not_found("Not found."))
}
