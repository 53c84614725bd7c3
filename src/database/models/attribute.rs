use serde::Serialize;
use sqlx::FromRow;

/// A tag or ingredient row
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Attribute {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub name: String,
}
