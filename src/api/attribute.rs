use serde::Deserialize;
use serde_json::Value;

use super::fields::{FieldReader, Presence, MAX_NAME_LENGTH};
use crate::error::ApiError;

/// Query string of tag and ingredient lists
#[derive(Debug, Default, Deserialize)]
pub struct AttributeListQuery {
    pub assigned_only: Option<String>,
}

/// `name` from a create or update body. Required unless `presence` says
/// otherwise; `None` means leave the name unchanged.
pub fn parse_name(body: &Value, presence: Presence) -> Result<Option<String>, ApiError> {
    let mut reader = FieldReader::new(body)?;
    let name = reader.string("name", presence, MAX_NAME_LENGTH);
    reader.finish()?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_name_is_rejected() {
        let err = parse_name(&json!({"name": ""}), Presence::Required).unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["name"], "This field may not be blank.");
    }

    #[test]
    fn optional_name_may_be_absent() {
        assert_eq!(parse_name(&json!({}), Presence::Optional).unwrap(), None);
        assert_eq!(
            parse_name(&json!({"name": "Salt"}), Presence::Optional).unwrap().as_deref(),
            Some("Salt")
        );
    }
}
