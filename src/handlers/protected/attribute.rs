// handlers/protected/attribute.rs - /api/recipe/tags/ and /api/recipe/ingredients/
//
// Both resources share these handlers; the router injects the AttributeKind.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    Json,
};
use serde_json::Value;

use super::parse_id;
use crate::api::attribute::{parse_name, AttributeListQuery};
use crate::api::fields::Presence;
use crate::database::models::Attribute;
use crate::database::AttributeRepository;
use crate::error::ApiError;
use crate::filter::AttributeFilter;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, DbPool, ValidatedUser};
use crate::types::AttributeKind;

/// GET - Caller's items by descending name, optionally only those in use
pub async fn list(
    Query(query): Query<AttributeListQuery>,
    Extension(kind): Extension<AttributeKind>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(user): Extension<ValidatedUser>,
) -> ApiResult<Vec<Attribute>> {
    let filter = AttributeFilter::from_params(query.assigned_only.as_deref())?;
    let items = AttributeRepository::new(kind, pool).list(user.id, &filter).await?;
    Ok(ApiResponse::success(items))
}

/// POST
pub async fn create(
    Extension(kind): Extension<AttributeKind>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(user): Extension<ValidatedUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Attribute> {
    let name = required_name(&json_body(payload)?)?;
    let item = AttributeRepository::new(kind, pool).create(user.id, &name).await?;
    Ok(ApiResponse::created(item))
}

/// GET :id
pub async fn get(
    Path(id): Path<String>,
    Extension(kind): Extension<AttributeKind>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(user): Extension<ValidatedUser>,
) -> ApiResult<Attribute> {
    let item = AttributeRepository::new(kind, pool).get(user.id, parse_id(&id)?).await?;
    Ok(ApiResponse::success(item))
}

/// PATCH :id - Name is optional
pub async fn patch(
    Path(id): Path<String>,
    Extension(kind): Extension<AttributeKind>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(user): Extension<ValidatedUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Attribute> {
    let id = parse_id(&id)?;
    let repository = AttributeRepository::new(kind, pool);
    let current = repository.get(user.id, id).await?;

    let item = match parse_name(&json_body(payload)?, Presence::Optional)? {
        Some(name) => repository.rename(user.id, id, &name).await?,
        None => current,
    };
    Ok(ApiResponse::success(item))
}

/// PUT :id - Name is required
pub async fn put(
    Path(id): Path<String>,
    Extension(kind): Extension<AttributeKind>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(user): Extension<ValidatedUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Attribute> {
    let id = parse_id(&id)?;
    let repository = AttributeRepository::new(kind, pool);
    repository.get(user.id, id).await?;

    let name = required_name(&json_body(payload)?)?;
    let item = repository.rename(user.id, id, &name).await?;
    Ok(ApiResponse::success(item))
}

/// DELETE :id - Unlinks from recipes, recipes stay
pub async fn delete(
    Path(id): Path<String>,
    Extension(kind): Extension<AttributeKind>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(user): Extension<ValidatedUser>,
) -> ApiResult<()> {
    AttributeRepository::new(kind, pool).delete(user.id, parse_id(&id)?).await?;
    Ok(ApiResponse::no_content())
}

fn required_name(body: &Value) -> Result<String, ApiError> {
    parse_name(body, Presence::Required)?.ok_or_else(|| ApiError::field_error("name", "This field is required."))
}
