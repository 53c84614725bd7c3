use super::error::FilterError;
use super::filter::Filter;
use super::params::parse_id_list;
use super::types::{SortDirection, SqlResult};

/// Recipe list filter: `tags` and `ingredients` are each OR-lists of ids,
/// combined with AND when both are given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<i64>>,
}

impl RecipeFilter {
    pub fn from_params(tags: Option<&str>, ingredients: Option<&str>) -> Result<Self, FilterError> {
        Ok(Self {
            tags: parse_id_list("tags", tags)?,
            ingredients: parse_id_list("ingredients", ingredients)?,
        })
    }

    /// Newest first, scoped to `user_id`
    pub fn to_sql(&self, user_id: i64) -> SqlResult {
        let mut filter = Filter::new("recipes");
        let where_clause = filter.where_clause();
        where_clause.eq("user_id", user_id);

        if let Some(tags) = &self.tags {
            where_clause.in_linked("id", "recipe_tags", "recipe_id", "tag_id", tags);
        }
        if let Some(ingredients) = &self.ingredients {
            where_clause.in_linked("id", "recipe_ingredients", "recipe_id", "ingredient_id", ingredients);
        }

        filter.order("id", SortDirection::Desc);
        filter.to_sql()
    }
}
