use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

use crate::database::UserRepository;
use crate::error::ApiError;
use super::auth::AuthUser;

/// Shared database pool, injected as a request extension
#[derive(Clone)]
pub struct DbPool(pub SqlitePool);

/// User from the token, confirmed to still exist and be active
#[derive(Clone, Debug)]
pub struct ValidatedUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_staff: bool,
}

/// Middleware that checks the JWT subject against the users table.
/// A token for a deleted or deactivated user is treated as no credentials.
pub async fn validate_user_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before user validation"))?;

    let DbPool(pool) = request
        .extensions()
        .get::<DbPool>()
        .cloned()
        .ok_or_else(|| ApiError::internal_server_error("Database pool required before user validation"))?;

    let user = UserRepository::new(pool)
        .find_active(auth_user.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Database error validating user {}: {}", auth_user.user_id, e);
            ApiError::internal_server_error("Failed to validate user")
        })?
        .ok_or_else(|| {
            tracing::warn!(
                "User validation failed: user {} ({}) not found or inactive",
                auth_user.user_id,
                auth_user.email
            );
            ApiError::unauthorized("User not found or inactive")
        })?;

    let validated_user = ValidatedUser {
        id: user.id,
        email: user.email,
        name: user.name,
        is_staff: user.is_staff,
    };

    tracing::debug!("User validation successful: {} ({})", validated_user.email, validated_user.id);

    request.extensions_mut().insert(validated_user);

    Ok(next.run(request).await)
}
