mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use common::{ids, TestApp};
use serde_json::json;

const INGREDIENTS_URL: &str = "/api/recipe/ingredients/";

#[tokio::test]
async fn list_ingredients() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.login("test@example.com").await?;
    let kale = app.create_ingredient(user, "Kale").await?;
    let salt = app.create_ingredient(user, "Salt").await?;

    let res = app.get(INGREDIENTS_URL, &token).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(ids(res.data()), vec![salt, kale]);
    Ok(())
}

#[tokio::test]
async fn ingredients_limited_to_user() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.login("test@example.com").await?;
    let other = app.create_user("other@example.com").await?;
    app.create_ingredient(other, "Vinegar").await?;
    let tumeric = app.create_ingredient(user, "Tumeric").await?;

    let res = app.get(INGREDIENTS_URL, &token).await?;
    assert_eq!(res.data(), &json!([{"id": tumeric, "name": "Tumeric"}]));
    Ok(())
}

#[tokio::test]
async fn create_ingredient() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.login("test@example.com").await?;

    let res = app
        .request(Method::POST, INGREDIENTS_URL, Some(&token), Some(json!({"name": "Cabbage"})))
        .await?;
    assert_eq!(res.status, StatusCode::CREATED);

    let res = app.get(INGREDIENTS_URL, &token).await?;
    assert_eq!(res.data()[0]["name"], "Cabbage");
    Ok(())
}

#[tokio::test]
async fn create_ingredient_invalid() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.login("test@example.com").await?;

    let res = app
        .request(Method::POST, INGREDIENTS_URL, Some(&token), Some(json!({"name": ""})))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn assigned_only_ingredients_unique() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.login("test@example.com").await?;
    let eggs = app.create_ingredient(user, "Eggs").await?;
    app.create_ingredient(user, "Cheese").await?;
    app.create_recipe(user, "Eggs benedict", vec![], vec![eggs]).await?;
    app.create_recipe(user, "Coriander eggs on toast", vec![], vec![eggs]).await?;

    let res = app.get(&format!("{}?assigned_only=1", INGREDIENTS_URL), &token).await?;
    assert_eq!(ids(res.data()), vec![eggs]);
    Ok(())
}

#[tokio::test]
async fn full_update_ingredient() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.login("test@example.com").await?;
    let id = app.create_ingredient(user, "Chili").await?;
    let url = format!("/api/recipe/ingredients/{}/", id);

    let res = app.request(Method::PUT, &url, Some(&token), Some(json!({}))).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .request(Method::PUT, &url, Some(&token), Some(json!({"name": "Coriander"})))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.get(&url, &token).await?.data()["name"], "Coriander");
    Ok(())
}
