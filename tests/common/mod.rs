#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use recipe_api::auth::{generate_jwt, hash_password, Claims};
use recipe_api::database::models::NewUser;
use recipe_api::database::{
    schema, AttributeRepository, DatabaseManager, NewRecipe, RecipeRepository, UserRepository,
};
use recipe_api::media::MediaStore;
use recipe_api::types::AttributeKind;
use recipe_api::{app, AppContext};

pub const PASSWORD: &str = "testpass123";
const BOUNDARY: &str = "recipe-test-boundary";

/// Router over a private in-memory database and a temporary media root
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub media: MediaStore,
    media_dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub bytes: Bytes,
}

impl TestResponse {
    /// Payload inside the success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.body["field_errors"][field].as_str()
    }
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let pool = DatabaseManager::connect_in_memory().await?;
        schema::migrate(&pool).await?;

        let media_dir = tempfile::tempdir().context("failed to create media dir")?;
        let media = MediaStore::new(media_dir.path(), "/media", 1024 * 1024);

        let router = app(AppContext::new(pool.clone(), media.clone()));
        Ok(Self {
            router,
            pool,
            media,
            media_dir,
        })
    }

    pub fn media_path(&self, relative: &str) -> std::path::PathBuf {
        self.media_dir.path().join(relative)
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Ok(TestResponse { status, body, bytes })
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<TestResponse> {
        self.request(Method::GET, uri, Some(token), None).await
    }

    /// POST a multipart body with one part named `field`. A `filename` makes
    /// it a file part, otherwise it is a plain text field.
    pub async fn multipart(
        &self,
        uri: &str,
        token: &str,
        field: &str,
        filename: Option<&str>,
        content: &[u8],
    ) -> Result<TestResponse> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    field, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))?;
        self.send(request).await
    }

    pub async fn create_user(&self, email: &str) -> Result<i64> {
        let user = UserRepository::new(self.pool.clone())
            .create(NewUser {
                email: email.to_string(),
                name: "Test user".to_string(),
                password_hash: hash_password(PASSWORD).map_err(|e| anyhow::anyhow!("{}", e))?,
                is_staff: false,
            })
            .await?;
        Ok(user.id)
    }

    pub fn token_for(&self, user_id: i64, email: &str) -> Result<String> {
        Ok(generate_jwt(Claims::new(user_id, email.to_string()))?)
    }

    /// New user plus a valid token for it
    pub async fn login(&self, email: &str) -> Result<(i64, String)> {
        let id = self.create_user(email).await?;
        let token = self.token_for(id, email)?;
        Ok((id, token))
    }

    pub async fn create_attribute(&self, kind: AttributeKind, user_id: i64, name: &str) -> Result<i64> {
        let item = AttributeRepository::new(kind, self.pool.clone())
            .create(user_id, name)
            .await?;
        Ok(item.id)
    }

    pub async fn create_tag(&self, user_id: i64, name: &str) -> Result<i64> {
        self.create_attribute(AttributeKind::Tag, user_id, name).await
    }

    pub async fn create_ingredient(&self, user_id: i64, name: &str) -> Result<i64> {
        self.create_attribute(AttributeKind::Ingredient, user_id, name).await
    }

    /// "Sample recipe", 10 minutes, 5.00, with the given relations
    pub async fn create_recipe(
        &self,
        user_id: i64,
        title: &str,
        tags: Vec<i64>,
        ingredients: Vec<i64>,
    ) -> Result<i64> {
        let id = RecipeRepository::new(self.pool.clone())
            .create(
                user_id,
                NewRecipe {
                    title: title.to_string(),
                    time_minutes: 10,
                    price: Decimal::new(500, 2),
                    tags,
                    ingredients,
                },
            )
            .await?;
        Ok(id)
    }
}

/// Small valid JPEG
pub fn jpeg_bytes() -> Vec<u8> {
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(10, 10);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg)
        .expect("encoding a blank JPEG cannot fail");
    out.into_inner()
}

/// Ids of a JSON array of objects, in order
pub fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_i64()).collect())
        .unwrap_or_default()
}
