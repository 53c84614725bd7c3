use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};

use crate::database::models::{Recipe, RecipeRow, RecipeWithAttributes, RecipeWithIds};
use crate::database::query::{bind_params_as, placeholders};
use crate::database::{AttributeRepository, DatabaseError};
use crate::filter::RecipeFilter;
use crate::types::AttributeKind;

const RECIPE_COLUMNS: &str = "id, user_id, title, time_minutes, price, image, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i64,
    pub price: Decimal,
    pub tags: Vec<i64>,
    pub ingredients: Vec<i64>,
}

/// Field updates; `None` leaves a column or relation as it is,
/// `Some(vec![])` clears a relation.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<Decimal>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<i64>>,
}

#[derive(Clone)]
pub struct RecipeRepository {
    pool: SqlitePool,
}

impl RecipeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: i64, filter: &RecipeFilter) -> Result<Vec<RecipeWithIds>, DatabaseError> {
        let sql = filter.to_sql(user_id);
        let q = sqlx::query_as::<_, RecipeRow>(&sql.query);
        let rows = bind_params_as(q, &sql.params).fetch_all(&self.pool).await?;

        let mut tag_links = self.link_map(AttributeKind::Tag, user_id).await?;
        let mut ingredient_links = self.link_map(AttributeKind::Ingredient, user_id).await?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                Ok(RecipeWithIds {
                    recipe: Recipe::try_from(row)?,
                    tag_ids: tag_links.remove(&id).unwrap_or_default(),
                    ingredient_ids: ingredient_links.remove(&id).unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Recipe owned by `user_id`, without relations
    pub async fn find(&self, user_id: i64, id: i64) -> Result<Recipe, DatabaseError> {
        let row = sqlx::query_as::<_, RecipeRow>(&format!(
            "SELECT {} FROM recipes WHERE id = ? AND user_id = ?",
            RECIPE_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)?;
        Recipe::try_from(row)
    }

    /// Recipe owned by `user_id` with its tags and ingredients
    pub async fn get(&self, user_id: i64, id: i64) -> Result<RecipeWithAttributes, DatabaseError> {
        let recipe = self.find(user_id, id).await?;
        let tags = AttributeRepository::new(AttributeKind::Tag, self.pool.clone())
            .for_recipe(recipe.id)
            .await?;
        let ingredients = AttributeRepository::new(AttributeKind::Ingredient, self.pool.clone())
            .for_recipe(recipe.id)
            .await?;
        Ok(RecipeWithAttributes { recipe, tags, ingredients })
    }

    pub async fn create(&self, user_id: i64, new_recipe: NewRecipe) -> Result<i64, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Write first so the transaction holds the write lock before any read.
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO recipes (user_id, title, time_minutes, price, image, created_at, updated_at)
             VALUES (?, ?, ?, ?, NULL, ?, ?)",
        )
        .bind(user_id)
        .bind(&new_recipe.title)
        .bind(new_recipe.time_minutes)
        .bind(new_recipe.price.to_string())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        let recipe_id = result.last_insert_rowid();

        ensure_owned(&mut tx, AttributeKind::Tag, user_id, &new_recipe.tags).await?;
        ensure_owned(&mut tx, AttributeKind::Ingredient, user_id, &new_recipe.ingredients).await?;

        replace_links(&mut tx, AttributeKind::Tag, recipe_id, &new_recipe.tags).await?;
        replace_links(&mut tx, AttributeKind::Ingredient, recipe_id, &new_recipe.ingredients).await?;

        tx.commit().await?;
        Ok(recipe_id)
    }

    pub async fn update(&self, user_id: i64, id: i64, changes: RecipeChanges) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE recipes SET
                title = COALESCE(?, title),
                time_minutes = COALESCE(?, time_minutes),
                price = COALESCE(?, price),
                updated_at = ?
             WHERE id = ? AND user_id = ?",
        )
        .bind(changes.title)
        .bind(changes.time_minutes)
        .bind(changes.price.map(|p| p.to_string()))
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        if let Some(tags) = changes.tags {
            ensure_owned(&mut tx, AttributeKind::Tag, user_id, &tags).await?;
            replace_links(&mut tx, AttributeKind::Tag, id, &tags).await?;
        }
        if let Some(ingredients) = changes.ingredients {
            ensure_owned(&mut tx, AttributeKind::Ingredient, user_id, &ingredients).await?;
            replace_links(&mut tx, AttributeKind::Ingredient, id, &ingredients).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Set or clear the stored image reference, returning the previous one
    pub async fn set_image(&self, user_id: i64, id: i64, image: Option<&str>) -> Result<Option<String>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE recipes SET updated_at = ? WHERE id = ? AND user_id = ?")
            .bind(Utc::now())
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(not_found());
        }

        let previous: (Option<String>,) = sqlx::query_as("SELECT image FROM recipes WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE recipes SET image = ? WHERE id = ?")
            .bind(image)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(previous.0)
    }

    /// Delete the recipe and its links, returning its image reference.
    /// Tags and ingredients are left in place.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<Option<String>, DatabaseError> {
        let image: (Option<String>,) =
            sqlx::query_as("DELETE FROM recipes WHERE id = ? AND user_id = ? RETURNING image")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(not_found)?;

        Ok(image.0)
    }

    /// recipe id -> linked ids (ascending) for every recipe of `user_id`
    async fn link_map(&self, kind: AttributeKind, user_id: i64) -> Result<HashMap<i64, Vec<i64>>, DatabaseError> {
        let pairs: Vec<(i64, i64)> = sqlx::query_as(&format!(
            "SELECT l.recipe_id, l.\"{col}\" FROM \"{link}\" l
             JOIN recipes r ON r.id = l.recipe_id
             WHERE r.user_id = ?
             ORDER BY l.recipe_id, l.\"{col}\"",
            col = kind.link_column(),
            link = kind.link_table()
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<i64, Vec<i64>> = HashMap::new();
        for (recipe_id, linked_id) in pairs {
            map.entry(recipe_id).or_default().push(linked_id);
        }
        Ok(map)
    }
}

fn not_found() -> DatabaseError {
    DatabaseError::NotFound("Recipe not found".to_string())
}

/// Every id must name a row of `kind` owned by `user_id`
async fn ensure_owned(
    conn: &mut SqliteConnection,
    kind: AttributeKind,
    user_id: i64,
    ids: &[i64],
) -> Result<(), DatabaseError> {
    if ids.is_empty() {
        return Ok(());
    }

    let sql = format!(
        "SELECT id FROM \"{}\" WHERE user_id = ? AND id IN ({})",
        kind.table(),
        placeholders(ids.len())
    );
    let mut q = sqlx::query_as::<_, (i64,)>(&sql).bind(user_id);
    for id in ids {
        q = q.bind(*id);
    }
    let found: Vec<i64> = q.fetch_all(&mut *conn).await?.into_iter().map(|r| r.0).collect();

    match ids.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(DatabaseError::InvalidReference {
            field: kind.field(),
            id: *missing,
        }),
        None => Ok(()),
    }
}

/// Make the recipe's links of `kind` exactly `ids`
async fn replace_links(
    conn: &mut SqliteConnection,
    kind: AttributeKind,
    recipe_id: i64,
    ids: &[i64],
) -> Result<(), DatabaseError> {
    sqlx::query(&format!("DELETE FROM \"{}\" WHERE recipe_id = ?", kind.link_table()))
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    let insert = format!(
        "INSERT OR IGNORE INTO \"{}\" (recipe_id, \"{}\") VALUES (?, ?)",
        kind.link_table(),
        kind.link_column()
    );
    for id in ids {
        sqlx::query(&insert)
            .bind(recipe_id)
            .bind(*id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
