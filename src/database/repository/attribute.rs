use sqlx::SqlitePool;

use crate::database::models::Attribute;
use crate::database::query::bind_params_as;
use crate::database::DatabaseError;
use crate::filter::AttributeFilter;
use crate::types::AttributeKind;

/// Tags and ingredients, selected by `kind`
pub struct AttributeRepository {
    kind: AttributeKind,
    pool: SqlitePool,
}

impl AttributeRepository {
    pub fn new(kind: AttributeKind, pool: SqlitePool) -> Self {
        Self { kind, pool }
    }

    pub async fn list(&self, user_id: i64, filter: &AttributeFilter) -> Result<Vec<Attribute>, DatabaseError> {
        let sql = filter.to_sql(self.kind, user_id);
        let q = sqlx::query_as::<_, Attribute>(&sql.query);
        let rows = bind_params_as(q, &sql.params).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn create(&self, user_id: i64, name: &str) -> Result<Attribute, DatabaseError> {
        let result = sqlx::query(&format!("INSERT INTO \"{}\" (user_id, name) VALUES (?, ?)", self.kind.table()))
            .bind(user_id)
            .bind(name)
            .execute(&self.pool)
            .await?;

        self.get(user_id, result.last_insert_rowid()).await
    }

    pub async fn get(&self, user_id: i64, id: i64) -> Result<Attribute, DatabaseError> {
        sqlx::query_as::<_, Attribute>(&format!(
            "SELECT id, user_id, name FROM \"{}\" WHERE id = ? AND user_id = ?",
            self.kind.table()
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| self.not_found())
    }

    pub async fn rename(&self, user_id: i64, id: i64, name: &str) -> Result<Attribute, DatabaseError> {
        let result = sqlx::query(&format!(
            "UPDATE \"{}\" SET name = ? WHERE id = ? AND user_id = ?",
            self.kind.table()
        ))
        .bind(name)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.not_found());
        }
        self.get(user_id, id).await
    }

    /// Removes the row and, through the cascade, its recipe links; recipes stay
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query(&format!("DELETE FROM \"{}\" WHERE id = ? AND user_id = ?", self.kind.table()))
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.not_found());
        }
        Ok(())
    }

    /// Items linked to one recipe, ascending by id
    pub async fn for_recipe(&self, recipe_id: i64) -> Result<Vec<Attribute>, DatabaseError> {
        let rows = sqlx::query_as::<_, Attribute>(&format!(
            "SELECT a.id, a.user_id, a.name FROM \"{table}\" a
             JOIN \"{link}\" l ON l.\"{col}\" = a.id
             WHERE l.recipe_id = ?
             ORDER BY a.id",
            table = self.kind.table(),
            link = self.kind.link_table(),
            col = self.kind.link_column()
        ))
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    fn not_found(&self) -> DatabaseError {
        DatabaseError::NotFound(format!("{} not found", self.kind.label()))
    }
}
