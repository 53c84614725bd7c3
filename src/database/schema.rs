//! Table definitions, applied idempotently at startup and by `recipe-admin db migrate`.

use sqlx::SqlitePool;
use tracing::info;

use super::DatabaseError;

// AUTOINCREMENT keeps ids monotonic, so ORDER BY id DESC lists newest first.
const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        email         TEXT    NOT NULL UNIQUE,
        name          TEXT    NOT NULL DEFAULT '',
        password_hash TEXT    NOT NULL,
        is_active     BOOLEAN NOT NULL DEFAULT 1,
        is_staff      BOOLEAN NOT NULL DEFAULT 0,
        created_at    TEXT    NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tags (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name    TEXT    NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ingredients (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name    TEXT    NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title        TEXT    NOT NULL,
        time_minutes INTEGER NOT NULL,
        price        TEXT    NOT NULL,
        image        TEXT,
        created_at   TEXT    NOT NULL,
        updated_at   TEXT    NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipe_tags (
        recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        tag_id    INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        PRIMARY KEY (recipe_id, tag_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipe_ingredients (
        recipe_id     INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
        PRIMARY KEY (recipe_id, ingredient_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tags_user ON tags (user_id, name)",
    "CREATE INDEX IF NOT EXISTS idx_ingredients_user ON ingredients (user_id, name)",
    "CREATE INDEX IF NOT EXISTS idx_recipes_user ON recipes (user_id, id)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_tags_tag ON recipe_tags (tag_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_ingredient ON recipe_ingredients (ingredient_id)",
];

/// Create all tables and indexes that do not exist yet
pub async fn migrate(pool: &SqlitePool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Database schema up to date ({} statements)", STATEMENTS.len());
    Ok(())
}
