use super::types::FilterOrderInfo;

pub struct FilterOrder;

impl FilterOrder {
    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::SortDirection;

    #[test]
    fn renders_multiple_columns_in_order() {
        let infos = [
            FilterOrderInfo { column: "name", sort: SortDirection::Desc },
            FilterOrderInfo { column: "id", sort: SortDirection::Asc },
        ];
        assert_eq!(FilterOrder::generate(&infos), "ORDER BY \"name\" DESC, \"id\" ASC");
        assert_eq!(FilterOrder::generate(&[]), "");
    }
}
