// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth): root, health, user registration and token issue.
// Protected (JWT + active user): profile, recipes, tags, ingredients.

pub mod public;
pub mod protected;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::error::ApiError;

/// Unwrap a JSON body, turning extractor rejections into API errors
pub(crate) fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::invalid_json(rejection.body_text())),
    }
}
