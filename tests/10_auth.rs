mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use common::TestApp;

const PROTECTED: &[&str] = &[
    "/api/recipe/recipes/",
    "/api/recipe/tags/",
    "/api/recipe/ingredients/",
    "/api/user/me/",
];

#[tokio::test]
async fn protected_routes_require_token() -> Result<()> {
    let app = TestApp::new().await?;

    for uri in PROTECTED {
        let res = app.request(Method::GET, uri, None, None).await?;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(res.body["code"], "UNAUTHORIZED");
    }
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.get("/api/recipe/recipes/", "not-a-token").await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn rejected_write_has_no_side_effects() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app
        .request(
            Method::POST,
            "/api/recipe/tags/",
            None,
            Some(serde_json::json!({"name": "Vegan"})),
        )
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags").fetch_one(&app.pool).await?;
    assert_eq!(count, 0);
    Ok(())
}

#[tokio::test]
async fn token_for_deleted_user_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;
    let (user_id, token) = app.login("gone@example.com").await?;

    assert_eq!(app.get("/api/recipe/recipes/", &token).await?.status, StatusCode::OK);

    recipe_api::database::UserRepository::new(app.pool.clone())
        .delete(user_id)
        .await?;

    let res = app.get("/api/recipe/recipes/", &token).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_for_inactive_user_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;
    let (user_id, token) = app.login("inactive@example.com").await?;

    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(user_id)
        .execute(&app.pool)
        .await?;

    let res = app.get("/api/recipe/tags/", &token).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn public_routes_need_no_token() -> Result<()> {
    let app = TestApp::new().await?;

    let res = app.request(Method::GET, "/health", None, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["database"], "ok");

    let res = app.request(Method::GET, "/", None, None).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    Ok(())
}
