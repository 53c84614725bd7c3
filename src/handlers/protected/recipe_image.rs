// handlers/protected/recipe_image.rs - POST/DELETE /api/recipe/recipes/:id/upload-image/

use axum::extract::{multipart::MultipartRejection, Extension, Multipart, Path};

use super::parse_id;
use crate::api::recipe::RecipeImage;
use crate::database::RecipeRepository;
use crate::error::ApiError;
use crate::media::{MediaError, MediaStore};
use crate::middleware::{ApiResponse, ApiResult, DbPool, ValidatedUser};

const IMAGE_FIELD: &str = "image";

/// POST - Replace the recipe image with the multipart `image` field.
/// Nothing is stored or changed unless the upload decodes as an image.
pub async fn upload(
    Path(id): Path<String>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(media): Extension<MediaStore>,
    Extension(user): Extension<ValidatedUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<RecipeImage> {
    let id = parse_id(&id)?;
    let repository = RecipeRepository::new(pool);
    repository.find(user.id, id).await?;

    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let bytes = read_image_field(&mut multipart).await?;

    let stored = media.save_recipe_image(bytes).await?;
    let previous = match repository.set_image(user.id, id, Some(&stored)).await {
        Ok(previous) => previous,
        Err(e) => {
            media.discard(&stored).await;
            return Err(e.into());
        }
    };

    if let Some(previous) = previous {
        media.discard(&previous).await;
    }

    tracing::debug!("User {} uploaded image {} for recipe {}", user.id, stored, id);
    Ok(ApiResponse::success(RecipeImage {
        id,
        image: Some(media.url(&stored)),
    }))
}

/// DELETE - Clear the image reference and remove the file
pub async fn remove(
    Path(id): Path<String>,
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(media): Extension<MediaStore>,
    Extension(user): Extension<ValidatedUser>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    if let Some(previous) = RecipeRepository::new(pool).set_image(user.id, id, None).await? {
        media.discard(&previous).await;
    }
    Ok(ApiResponse::no_content())
}

async fn read_image_field(multipart: &mut Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(MediaError::Missing.into())
}
