use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{DecimalLimits, FieldReader, Presence, MAX_NAME_LENGTH};
use crate::database::models::{Attribute, RecipeWithAttributes, RecipeWithIds};
use crate::database::{NewRecipe, RecipeChanges};
use crate::error::ApiError;
use crate::media::MediaStore;

pub const PRICE: DecimalLimits = DecimalLimits {
    max_digits: 5,
    decimal_places: 2,
};

/// Query string of the recipe list
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

/// List representation: relations as id lists, no image
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub time_minutes: i64,
    pub price: String,
    pub tags: Vec<i64>,
    pub ingredients: Vec<i64>,
}

impl From<RecipeWithIds> for RecipeSummary {
    fn from(row: RecipeWithIds) -> Self {
        Self {
            id: row.recipe.id,
            title: row.recipe.title,
            time_minutes: row.recipe.time_minutes,
            price: format_price(row.recipe.price),
            tags: row.tag_ids,
            ingredients: row.ingredient_ids,
        }
    }
}

/// Detail representation: nested relations and the image URL
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub time_minutes: i64,
    pub price: String,
    pub tags: Vec<Attribute>,
    pub ingredients: Vec<Attribute>,
    pub image: Option<String>,
}

impl RecipeDetail {
    pub fn new(row: RecipeWithAttributes, media: &MediaStore) -> Self {
        Self {
            id: row.recipe.id,
            title: row.recipe.title,
            time_minutes: row.recipe.time_minutes,
            price: format_price(row.recipe.price),
            tags: row.tags,
            ingredients: row.ingredients,
            image: row.recipe.image.as_deref().map(|path| media.url(path)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeImage {
    pub id: i64,
    pub image: Option<String>,
}

/// Two decimal places, e.g. `5.00`
pub fn format_price(price: Decimal) -> String {
    let mut price = price;
    price.rescale(PRICE.decimal_places);
    price.to_string()
}

pub fn parse_new_recipe(body: &Value) -> Result<NewRecipe, ApiError> {
    let mut reader = FieldReader::new(body)?;
    let title = reader.string("title", Presence::Required, MAX_NAME_LENGTH);
    let time_minutes = reader.integer("time_minutes", Presence::Required);
    let price = reader.decimal("price", Presence::Required, PRICE);
    let tags = reader.id_list("tags", Presence::Optional);
    let ingredients = reader.id_list("ingredients", Presence::Optional);
    reader.finish()?;

    match (title, time_minutes, price) {
        (Some(title), Some(time_minutes), Some(price)) => Ok(NewRecipe {
            title,
            time_minutes,
            price,
            tags: tags.unwrap_or_default(),
            ingredients: ingredients.unwrap_or_default(),
        }),
        _ => Err(ApiError::bad_request("Invalid input")),
    }
}

/// PUT: scalar fields required, absent relations become empty.
/// PATCH: everything optional, absent fields untouched.
pub fn parse_recipe_changes(body: &Value, full: bool) -> Result<RecipeChanges, ApiError> {
    let presence = if full { Presence::Required } else { Presence::Optional };

    let mut reader = FieldReader::new(body)?;
    let title = reader.string("title", presence, MAX_NAME_LENGTH);
    let time_minutes = reader.integer("time_minutes", presence);
    let price = reader.decimal("price", presence, PRICE);
    let tags = reader.id_list("tags", Presence::Optional);
    let ingredients = reader.id_list("ingredients", Presence::Optional);
    reader.finish()?;

    let (tags, ingredients) = if full {
        (Some(tags.unwrap_or_default()), Some(ingredients.unwrap_or_default()))
    } else {
        (tags, ingredients)
    };

    Ok(RecipeChanges {
        title,
        time_minutes,
        price,
        tags,
        ingredients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_requires_scalars() {
        let err = parse_new_recipe(&json!({"title": "Cheesecake"})).unwrap_err();
        let body = err.to_json();
        assert_eq!(body["field_errors"]["time_minutes"], "This field is required.");
        assert_eq!(body["field_errors"]["price"], "This field is required.");
        assert!(body["field_errors"].get("title").is_none());
    }

    #[test]
    fn create_defaults_relations_to_empty() {
        let recipe = parse_new_recipe(&json!({"title": "Soup", "time_minutes": 20, "price": 15})).unwrap();
        assert_eq!(recipe.price.to_string(), "15.00");
        assert!(recipe.tags.is_empty());
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn put_clears_absent_relations_patch_keeps_them() {
        let body = json!({"title": "Spaghetti chicken", "time_minutes": 25, "price": 12.00});

        let full = parse_recipe_changes(&body, true).unwrap();
        assert_eq!(full.tags, Some(vec![]));
        assert_eq!(full.ingredients, Some(vec![]));

        let partial = parse_recipe_changes(&body, false).unwrap();
        assert_eq!(partial.tags, None);
        assert_eq!(partial.ingredients, None);
    }

    #[test]
    fn put_requires_scalars_patch_does_not() {
        let body = json!({"tags": [1]});
        assert!(parse_recipe_changes(&body, true).is_err());

        let partial = parse_recipe_changes(&body, false).unwrap();
        assert_eq!(partial.tags, Some(vec![1]));
        assert!(partial.title.is_none());
    }

    #[test]
    fn price_renders_two_decimals() {
        assert_eq!(format_price(Decimal::new(5, 0)), "5.00");
        assert_eq!(format_price(Decimal::new(1250, 2)), "12.50");
    }
}
