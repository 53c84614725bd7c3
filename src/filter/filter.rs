use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOrderInfo, SortDirection, SqlResult};

/// SELECT statement over a single table: conditions, then ordering
pub struct Filter {
    table_name: &'static str,
    where_data: FilterWhere,
    order_data: Vec<FilterOrderInfo>,
}

impl Filter {
    pub fn new(table_name: &'static str) -> Self {
        Self {
            table_name,
            where_data: FilterWhere::new(),
            order_data: vec![],
        }
    }

    pub fn where_clause(&mut self) -> &mut FilterWhere {
        &mut self.where_data
    }

    pub fn order(&mut self, column: &'static str, sort: SortDirection) -> &mut Self {
        self.order_data.push(FilterOrderInfo { column, sort });
        self
    }

    pub fn to_sql(self) -> SqlResult {
        let order_clause = FilterOrder::generate(&self.order_data);
        let (where_clause, params) = self.where_data.build();

        let query = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_clause),
            order_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::SqlParam;

    #[test]
    fn assembles_select_where_order() {
        let mut filter = Filter::new("recipes");
        filter.where_clause().eq("user_id", 3_i64);
        filter.order("id", SortDirection::Desc);

        let sql = filter.to_sql();
        assert_eq!(sql.query, "SELECT * FROM \"recipes\" WHERE \"user_id\" = ? ORDER BY \"id\" DESC");
        assert_eq!(sql.params, vec![SqlParam::Int(3)]);
    }
}
