use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::media::MediaStore;
use crate::middleware::{jwt_auth_middleware, validate_user_middleware, DbPool};
use crate::types::AttributeKind;

const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Everything the router shares between requests
#[derive(Clone)]
pub struct AppContext {
    pub pool: SqlitePool,
    pub media: MediaStore,
    pub max_request_size_bytes: usize,
    /// Allowed CORS origins; `None` disables the CORS layer
    pub cors_origins: Option<Vec<String>>,
    pub request_logging: bool,
}

impl AppContext {
    pub fn new(pool: SqlitePool, media: MediaStore) -> Self {
        Self {
            pool,
            media,
            max_request_size_bytes: DEFAULT_BODY_LIMIT,
            cors_origins: None,
            request_logging: false,
        }
    }

    pub fn from_config(pool: SqlitePool, config: &AppConfig) -> Self {
        Self {
            pool,
            media: MediaStore::from_config(&config.media),
            max_request_size_bytes: config.api.max_request_size_bytes,
            cors_origins: config
                .security
                .enable_cors
                .then(|| config.security.cors_origins.clone()),
            request_logging: config.api.enable_request_logging,
        }
    }
}

pub fn app(ctx: AppContext) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::root::root))
        .route("/health", get(public::root::health))
        .merge(user_public_routes())
        // Protected
        .merge(protected_routes());

    // Stored images, read-only
    let media_prefix = ctx.media.url_prefix().to_string();
    if media_prefix.starts_with('/') && media_prefix.len() > 1 {
        router = router.nest_service(&media_prefix, ServeDir::new(ctx.media.root()));
    } else {
        tracing::warn!("Media URL prefix {:?} cannot be routed; stored images are not served", media_prefix);
    }

    router = router
        .layer(Extension(DbPool(ctx.pool)))
        .layer(Extension(ctx.media))
        .layer(DefaultBodyLimit::max(ctx.max_request_size_bytes));

    if let Some(origins) = ctx.cors_origins {
        router = router.layer(cors_layer(&origins));
    }

    if ctx.request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn user_public_routes() -> Router {
    use public::user;

    Router::new()
        .route("/api/user/create/", post(user::create))
        .route("/api/user/token/", post(user::token))
}

/// Routes behind JWT validation and the active-user check.
/// `route_layer` keeps unknown paths as plain 404s.
fn protected_routes() -> Router {
    Router::new()
        .merge(user_routes())
        .merge(recipe_routes())
        .merge(attribute_routes("/api/recipe/tags", AttributeKind::Tag))
        .merge(attribute_routes("/api/recipe/ingredients", AttributeKind::Ingredient))
        .route_layer(from_fn(validate_user_middleware))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn user_routes() -> Router {
    use protected::user;

    Router::new().route(
        "/api/user/me/",
        get(user::me_get).patch(user::me_patch).put(user::me_put),
    )
}

fn recipe_routes() -> Router {
    use protected::{recipe, recipe_image};

    Router::new()
        .route("/api/recipe/recipes/", get(recipe::list).post(recipe::create))
        .route(
            "/api/recipe/recipes/:id/",
            get(recipe::get)
                .patch(recipe::patch)
                .put(recipe::put)
                .delete(recipe::delete),
        )
        .route(
            "/api/recipe/recipes/:id/upload-image/",
            post(recipe_image::upload).delete(recipe_image::remove),
        )
}

/// Tags and ingredients share handlers; the kind travels as an extension
fn attribute_routes(base: &str, kind: AttributeKind) -> Router {
    use protected::attribute;

    Router::new()
        .route(&format!("{}/", base), get(attribute::list).post(attribute::create))
        .route(
            &format!("{}/:id/", base),
            get(attribute::get)
                .patch(attribute::patch)
                .put(attribute::put)
                .delete(attribute::delete),
        )
        .layer(Extension(kind))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
