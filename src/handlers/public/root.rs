// handlers/public/root.rs - GET / and GET /health

use axum::extract::Extension;
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, DbPool};

/// GET / - Service name and route overview
pub async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "user": ["/api/user/create/", "/api/user/token/", "/api/user/me/"],
            "recipe": ["/api/recipe/recipes/", "/api/recipe/tags/", "/api/recipe/ingredients/"]
        }
    })))
}

/// GET /health - Database liveness
pub async fn health(Extension(DbPool(pool)): Extension<DbPool>) -> ApiResult<Value> {
    DatabaseManager::health_check(&pool).await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("Database temporarily unavailable")
    })?;

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "database": "ok"
    })))
}
