use anyhow::Context;
use tracing_subscriber::EnvFilter;

use recipe_api::database::{schema, DatabaseManager};
use recipe_api::{app, config, is_production, AppContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting Recipe API in {:?} mode", config.environment);

    if is_production!() && config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set in production");
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    schema::migrate(&pool).await?;

    tokio::fs::create_dir_all(&config.media.root)
        .await
        .with_context(|| format!("failed to create media root {}", config.media.root.display()))?;

    let app = app(AppContext::from_config(pool, config));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Recipe API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
