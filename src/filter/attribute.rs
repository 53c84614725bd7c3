use super::error::FilterError;
use super::filter::Filter;
use super::params::parse_flag;
use super::types::{SortDirection, SqlResult};
use crate::types::AttributeKind;

/// Tag/ingredient list filter
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttributeFilter {
    pub assigned_only: bool,
}

impl AttributeFilter {
    pub fn from_params(assigned_only: Option<&str>) -> Result<Self, FilterError> {
        Ok(Self {
            assigned_only: parse_flag("assigned_only", assigned_only)?,
        })
    }

    /// Owner-scoped, descending by name. The assigned-only restriction is an
    /// EXISTS test, so an item linked to several recipes still yields one row.
    pub fn to_sql(&self, kind: AttributeKind, user_id: i64) -> SqlResult {
        let mut filter = Filter::new(kind.table());
        let where_clause = filter.where_clause();
        where_clause.eq("user_id", user_id);

        if self.assigned_only {
            where_clause.has_recipe_link(kind.table(), kind.link_table(), kind.link_column(), user_id);
        }

        filter.order("name", SortDirection::Desc).order("id", SortDirection::Desc);
        filter.to_sql()
    }
}
