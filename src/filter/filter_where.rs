use super::types::SqlParam;

/// Accumulates AND-joined conditions and their bind values.
/// Column and table names are always compile-time constants; only values are bound.
#[derive(Debug, Default)]
pub struct FilterWhere {
    conditions: Vec<String>,
    params: Vec<SqlParam>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = ?`
    pub fn eq(&mut self, column: &str, value: impl Into<SqlParam>) -> &mut Self {
        let placeholder = self.param(value.into());
        self.conditions.push(format!("\"{}\" = {}", column, placeholder));
        self
    }

    /// `column IN (SELECT select_column FROM table WHERE match_column IN (?, ...))`
    ///
    /// Membership through a link table; any matching id qualifies the row.
    pub fn in_linked(
        &mut self,
        column: &str,
        link_table: &str,
        select_column: &str,
        match_column: &str,
        ids: &[i64],
    ) -> &mut Self {
        if ids.is_empty() {
            self.conditions.push("1=0".to_string());
            return self;
        }
        let placeholders: Vec<String> = ids.iter().map(|id| self.param(SqlParam::Int(*id))).collect();
        self.conditions.push(format!(
            "\"{}\" IN (SELECT \"{}\" FROM \"{}\" WHERE \"{}\" IN ({}))",
            column,
            select_column,
            link_table,
            match_column,
            placeholders.join(", ")
        ));
        self
    }

    /// `EXISTS (SELECT 1 FROM link JOIN recipes ON ... WHERE link.match_column = outer.id AND recipes.user_id = ?)`
    pub fn has_recipe_link(
        &mut self,
        outer_table: &str,
        link_table: &str,
        match_column: &str,
        user_id: i64,
    ) -> &mut Self {
        let placeholder = self.param(SqlParam::Int(user_id));
        self.conditions.push(format!(
            "EXISTS (SELECT 1 FROM \"{link}\" l JOIN \"recipes\" r ON r.\"id\" = l.\"recipe_id\" \
             WHERE l.\"{col}\" = \"{outer}\".\"id\" AND r.\"user_id\" = {p})",
            link = link_table,
            col = match_column,
            outer = outer_table,
            p = placeholder
        ));
        self
    }

    pub fn build(self) -> (String, Vec<SqlParam>) {
        let clause = if self.conditions.is_empty() {
            "1=1".to_string()
        } else {
            self.conditions.join(" AND ")
        };
        (clause, self.params)
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.params.push(value);
        "?".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builds_tautology() {
        let (clause, params) = FilterWhere::new().build();
        assert_eq!(clause, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn linked_membership_binds_every_id() {
        let mut w = FilterWhere::new();
        w.eq("user_id", 7_i64).in_linked("id", "recipe_tags", "recipe_id", "tag_id", &[1, 2]);
        let (clause, params) = w.build();
        assert_eq!(
            clause,
            "\"user_id\" = ? AND \"id\" IN (SELECT \"recipe_id\" FROM \"recipe_tags\" WHERE \"tag_id\" IN (?, ?))"
        );
        assert_eq!(params, vec![SqlParam::Int(7), SqlParam::Int(1), SqlParam::Int(2)]);
    }

    #[test]
    fn empty_id_list_matches_nothing() {
        let mut w = FilterWhere::new();
        w.in_linked("id", "recipe_tags", "recipe_id", "tag_id", &[]);
        assert_eq!(w.build().0, "1=0");
    }
}
