// handlers/protected/recipe.rs - /api/recipe/recipes/ and /api/recipe/recipes/:id/

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    Json,
};
use serde_json::Value;

use super::parse_id;
use crate::api::recipe::{parse_new_recipe, parse_recipe_changes, RecipeDetail, RecipeListQuery, RecipeSummary};
use crate::database::RecipeRepository;
use crate::filter::RecipeFilter;
use crate::handlers::json_body;
use crate::media::MediaStore;
use crate::middleware::{ApiResponse, ApiResult, DbPool, ValidatedUser};

/// GET /api/recipe/recipes/ - Caller's recipes, newest first, optionally filtered
pub async fn list(
    Query(query): Query<RecipeListQuery>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(user): Extension<ValidatedUser>,
) -> ApiResult<Vec<RecipeSummary>> {
    let filter = RecipeFilter::from_params(query.tags.as_deref(), query.ingredients.as_deref())?;
    let recipes = RecipeRepository::new(pool).list(user.id, &filter).await?;
    Ok(ApiResponse::success(recipes.into_iter().map(RecipeSummary::from).collect()))
}

/// POST /api/recipe/recipes/
pub async fn create(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(media): Extension<MediaStore>,
    Extension(user): Extension<ValidatedUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<RecipeDetail> {
    let new_recipe = parse_new_recipe(&json_body(payload)?)?;

    let repository = RecipeRepository::new(pool);
    let id = repository.create(user.id, new_recipe).await?;
    let recipe = repository.get(user.id, id).await?;

    tracing::debug!("User {} created recipe {}", user.id, id);
    Ok(ApiResponse::created(RecipeDetail::new(recipe, &media)))
}

/// GET /api/recipe/recipes/:id/
pub async fn get(
    Path(id): Path<String>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(media): Extension<MediaStore>,
    Extension(user): Extension<ValidatedUser>,
) -> ApiResult<RecipeDetail> {
    let recipe = RecipeRepository::new(pool).get(user.id, parse_id(&id)?).await?;
    Ok(ApiResponse::success(RecipeDetail::new(recipe, &media)))
}

/// PATCH /api/recipe/recipes/:id/ - Supplied fields only; a supplied relation list replaces the set
pub async fn patch(
    Path(id): Path<String>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(media): Extension<MediaStore>,
    Extension(user): Extension<ValidatedUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<RecipeDetail> {
    update(id, pool, media, user, payload, false).await
}

/// PUT /api/recipe/recipes/:id/ - Full replace; relations not supplied are cleared
pub async fn put(
    Path(id): Path<String>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(media): Extension<MediaStore>,
    Extension(user): Extension<ValidatedUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<RecipeDetail> {
    update(id, pool, media, user, payload, true).await
}

async fn update(
    id: String,
    pool: sqlx::SqlitePool,
    media: MediaStore,
    user: ValidatedUser,
    payload: Result<Json<Value>, JsonRejection>,
    full: bool,
) -> ApiResult<RecipeDetail> {
    let id = parse_id(&id)?;
    let repository = RecipeRepository::new(pool);
    // 404 takes precedence over payload errors
    repository.find(user.id, id).await?;

    let changes = parse_recipe_changes(&json_body(payload)?, full)?;
    repository.update(user.id, id, changes).await?;

    let recipe = repository.get(user.id, id).await?;
    Ok(ApiResponse::success(RecipeDetail::new(recipe, &media)))
}

/// DELETE /api/recipe/recipes/:id/ - Tags and ingredients stay; the image file goes
pub async fn delete(
    Path(id): Path<String>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(media): Extension<MediaStore>,
    Extension(user): Extension<ValidatedUser>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    if let Some(image) = RecipeRepository::new(pool).delete(user.id, id).await? {
        media.discard(&image).await;
    }

    tracing::debug!("User {} deleted recipe {}", user.id, id);
    Ok(ApiResponse::no_content())
}
