// handlers/protected/user.rs - GET/PATCH/PUT /api/user/me/

use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use serde_json::Value;

use crate::api::user::{parse_profile_changes, UserProfile};
use crate::auth::hash_password_async;
use crate::database::UserRepository;
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, DbPool, ValidatedUser};

/// GET /api/user/me/
pub async fn me_get(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(user): Extension<ValidatedUser>,
) -> ApiResult<UserProfile> {
    let user = UserRepository::new(pool).get(user.id).await?;
    Ok(ApiResponse::success(UserProfile::from(user)))
}

/// PATCH /api/user/me/
pub async fn me_patch(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(user): Extension<ValidatedUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<UserProfile> {
    update_profile(pool, user, json_body(payload)?, false).await
}

/// PUT /api/user/me/
pub async fn me_put(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(user): Extension<ValidatedUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<UserProfile> {
    update_profile(pool, user, json_body(payload)?, true).await
}

async fn update_profile(
    pool: sqlx::SqlitePool,
    user: ValidatedUser,
    body: Value,
    full: bool,
) -> ApiResult<UserProfile> {
    let changes = parse_profile_changes(&body, full)?;

    let password_hash = match changes.password {
        Some(password) => Some(hash_password_async(password).await.map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            ApiError::internal_server_error("Failed to update user")
        })?),
        None => None,
    };

    let updated = UserRepository::new(pool)
        .update_profile(user.id, changes.name, password_hash)
        .await?;
    Ok(ApiResponse::success(UserProfile::from(updated)))
}
