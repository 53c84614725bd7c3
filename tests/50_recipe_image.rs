mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use common::{jpeg_bytes, TestApp};

fn upload_url(id: i64) -> String {
    format!("/api/recipe/recipes/{}/upload-image/", id)
}

fn detail_url(id: i64) -> String {
    format!("/api/recipe/recipes/{}/", id)
}

async fn stored_image(app: &TestApp, recipe: i64) -> Result<Option<String>> {
    let (image,): (Option<String>,) = sqlx::query_as("SELECT image FROM recipes WHERE id = ?")
        .bind(recipe)
        .fetch_one(&app.pool)
        .await?;
    Ok(image)
}

#[tokio::test]
async fn upload_jpeg_stores_and_serves_file() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.login("test@example.com").await?;
    let recipe = app.create_recipe(user, "Sample recipe", vec![], vec![]).await?;

    let res = app
        .multipart(&upload_url(recipe), &token, "image", Some("photo.jpg"), &jpeg_bytes())
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["id"], recipe);

    let url = res.data()["image"].as_str().unwrap_or_default().to_string();
    assert!(url.starts_with("/media/uploads/recipe/"), "{}", url);
    assert!(url.ends_with(".jpg"));

    let stored = stored_image(&app, recipe).await?.unwrap_or_default();
    assert!(app.media_path(&stored).exists());

    let detail = app.get(&detail_url(recipe), &token).await?;
    assert_eq!(detail.data()["image"], url.as_str());

    let served = app.request(Method::GET, &url, None, None).await?;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.bytes.as_ref(), jpeg_bytes().as_slice());
    Ok(())
}

#[tokio::test]
async fn upload_non_image_changes_nothing() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.login("test@example.com").await?;
    let recipe = app.create_recipe(user, "Sample recipe", vec![], vec![]).await?;

    let res = app
        .multipart(&upload_url(recipe), &token, "image", None, b"not-image")
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.field_error("image").is_some());
    assert_eq!(stored_image(&app, recipe).await?, None);

    let res = app
        .multipart(&upload_url(recipe), &token, "image", Some("empty.jpg"), b"")
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .multipart(&upload_url(recipe), &token, "photo", Some("photo.jpg"), &jpeg_bytes())
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.field_error("image"), Some("No file was submitted."));

    assert_eq!(stored_image(&app, recipe).await?, None);
    assert!(!app.media_path("uploads/recipe").exists());
    Ok(())
}

#[tokio::test]
async fn new_upload_replaces_previous_file() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.login("test@example.com").await?;
    let recipe = app.create_recipe(user, "Sample recipe", vec![], vec![]).await?;

    app.multipart(&upload_url(recipe), &token, "image", Some("a.jpg"), &jpeg_bytes())
        .await?;
    let first = stored_image(&app, recipe).await?.unwrap_or_default();

    let res = app
        .multipart(&upload_url(recipe), &token, "image", Some("b.jpg"), &jpeg_bytes())
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    let second = stored_image(&app, recipe).await?.unwrap_or_default();

    assert_ne!(first, second);
    assert!(!app.media_path(&first).exists());
    assert!(app.media_path(&second).exists());
    Ok(())
}

#[tokio::test]
async fn upload_to_other_users_recipe_is_not_found() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.login("test@example.com").await?;
    let other = app.create_user("other@example.com").await?;
    let theirs = app.create_recipe(other, "Theirs", vec![], vec![]).await?;

    let res = app
        .multipart(&upload_url(theirs), &token, "image", Some("photo.jpg"), &jpeg_bytes())
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(stored_image(&app, theirs).await?, None);
    Ok(())
}

#[tokio::test]
async fn remove_image_clears_reference_and_file() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.login("test@example.com").await?;
    let recipe = app.create_recipe(user, "Sample recipe", vec![], vec![]).await?;

    app.multipart(&upload_url(recipe), &token, "image", Some("photo.jpg"), &jpeg_bytes())
        .await?;
    let stored = stored_image(&app, recipe).await?.unwrap_or_default();

    let res = app.request(Method::DELETE, &upload_url(recipe), Some(&token), None).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert_eq!(stored_image(&app, recipe).await?, None);
    assert!(!app.media_path(&stored).exists());

    let detail = app.get(&detail_url(recipe), &token).await?;
    assert!(detail.data()["image"].is_null());
    Ok(())
}

#[tokio::test]
async fn deleting_recipe_removes_its_image() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.login("test@example.com").await?;
    let recipe = app.create_recipe(user, "Sample recipe", vec![], vec![]).await?;

    app.multipart(&upload_url(recipe), &token, "image", Some("photo.jpg"), &jpeg_bytes())
        .await?;
    let stored = stored_image(&app, recipe).await?.unwrap_or_default();
    assert!(app.media_path(&stored).exists());

    let res = app.request(Method::DELETE, &detail_url(recipe), Some(&token), None).await?;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(!app.media_path(&stored).exists());
    Ok(())
}
