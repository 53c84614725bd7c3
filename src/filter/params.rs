//! Query-string value parsing shared by the list endpoints.

use super::error::FilterError;

/// Parse `"1,2,3"` into ids. Blank segments are skipped; `None` means no filter.
pub fn parse_id_list(param: &'static str, raw: Option<&str>) -> Result<Option<Vec<i64>>, FilterError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let mut ids = Vec::new();
    for part in raw.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let id = trimmed.parse::<i64>().map_err(|_| FilterError::InvalidId {
            param,
            value: trimmed.to_string(),
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    Ok(if ids.is_empty() { None } else { Some(ids) })
}

/// Integer flag: any non-zero integer is true, absent is false.
pub fn parse_flag(param: &'static str, raw: Option<&str>) -> Result<bool, FilterError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(false),
        Some(value) => value
            .parse::<i64>()
            .map(|v| v != 0)
            .map_err(|_| FilterError::InvalidFlag {
                param,
                value: value.to_string(),
            }),
    }
}
