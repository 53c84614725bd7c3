// handlers/public/user.rs - POST /api/user/create/ and POST /api/user/token/

use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use serde_json::Value;

use crate::api::user::{parse_credentials, parse_registration, TokenResponse, UserProfile};
use crate::auth::{generate_jwt, hash_password_async, verify_password_async, Claims};
use crate::database::models::NewUser;
use crate::database::UserRepository;
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, DbPool};

const BAD_CREDENTIALS: &str = "Unable to authenticate with provided credentials";

/// POST /api/user/create/ - Register a new user
pub async fn create(
    Extension(DbPool(pool)): Extension<DbPool>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<UserProfile> {
    let registration = parse_registration(&json_body(payload)?)?;

    let password_hash = hash_password_async(registration.password).await.map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        ApiError::internal_server_error("Failed to create user")
    })?;

    let user = UserRepository::new(pool)
        .create(NewUser {
            email: registration.email,
            name: registration.name,
            password_hash,
            is_staff: false,
        })
        .await?;

    tracing::info!("Registered user {} ({})", user.id, user.email);
    Ok(ApiResponse::created(UserProfile::from(user)))
}

/// POST /api/user/token/ - Exchange email and password for a JWT
pub async fn token(
    Extension(DbPool(pool)): Extension<DbPool>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let credentials = parse_credentials(&json_body(payload)?)?;

    let user = UserRepository::new(pool)
        .find_by_email(&credentials.email)
        .await?
        .filter(|user| user.is_active);

    let verified = match &user {
        Some(user) => password_matches(credentials.password, user.password_hash.clone()).await,
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::warn!("Rejected token request for {}", credentials.email);
            return Err(ApiError::field_error("non_field_errors", BAD_CREDENTIALS));
        }
    };

    let token = generate_jwt(Claims::new(user.id, user.email.clone()))?;

    tracing::debug!("Issued token for user {}", user.id);
    Ok(ApiResponse::success(TokenResponse { token }))
}

async fn password_matches(password: String, hash: String) -> bool {
    verify_password_async(password, hash).await.unwrap_or_else(|e| {
        tracing::error!("Password check failed: {}", e);
        false
    })
}
