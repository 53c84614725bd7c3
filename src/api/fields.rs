//! Field-by-field reading of JSON request bodies. Every problem is collected
//! per field so a single 400 reports all of them.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::{ApiError, FieldErrors};

pub const MAX_NAME_LENGTH: usize = 255;

pub const REQUIRED: &str = "This field is required.";

/// Whether a missing field is an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Limits for decimal fields
#[derive(Debug, Clone, Copy)]
pub struct DecimalLimits {
    pub max_digits: u32,
    pub decimal_places: u32,
}

pub struct FieldReader<'a> {
    body: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(body: &'a Value) -> Result<Self, ApiError> {
        let body = body
            .as_object()
            .ok_or_else(|| ApiError::invalid_json("Request body must be a JSON object"))?;
        Ok(Self {
            body,
            errors: FieldErrors::new(),
        })
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Present, non-null value, or records the matching error
    fn value(&mut self, field: &str, presence: Presence) -> Option<&'a Value> {
        let body = self.body;
        match body.get(field) {
            None => {
                if presence == Presence::Required {
                    self.fail(field, REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                self.fail(field, "This field may not be null.");
                None
            }
            Some(value) => Some(value),
        }
    }

    /// Trimmed, non-blank text of at most `max_length` characters
    pub fn string(&mut self, field: &str, presence: Presence, max_length: usize) -> Option<String> {
        let value = self.value(field, presence)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.fail(field, "Not a valid string.");
                return None;
            }
        };

        if text.is_empty() {
            self.fail(field, "This field may not be blank.");
            return None;
        }
        if text.chars().count() > max_length {
            self.fail(field, format!("Ensure this field has no more than {} characters.", max_length));
            return None;
        }
        Some(text)
    }

    /// Text taken as given, without trimming; for secrets
    pub fn raw_string(&mut self, field: &str, presence: Presence) -> Option<String> {
        match self.value(field, presence)? {
            Value::String(s) if s.is_empty() => {
                self.fail(field, "This field may not be blank.");
                None
            }
            Value::String(s) => Some(s.clone()),
            _ => {
                self.fail(field, "Not a valid string.");
                None
            }
        }
    }

    pub fn integer(&mut self, field: &str, presence: Presence) -> Option<i64> {
        let value = self.value(field, presence)?;
        let parsed = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        if parsed.is_none() {
            self.fail(field, "A valid integer is required.");
        }
        parsed
    }

    /// Decimal within the given precision, rescaled to exactly `decimal_places`
    pub fn decimal(&mut self, field: &str, presence: Presence, limits: DecimalLimits) -> Option<Decimal> {
        let value = self.value(field, presence)?;
        let text = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            _ => String::new(),
        };

        let parsed = Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text));
        let mut decimal = match parsed {
            Ok(d) => d,
            Err(_) => {
                self.fail(field, "A valid number is required.");
                return None;
            }
        };

        if let Err(message) = check_precision(&decimal, limits) {
            self.fail(field, message);
            return None;
        }

        decimal.rescale(limits.decimal_places);
        Some(decimal)
    }

    /// List of primary keys, duplicates dropped, order kept
    pub fn id_list(&mut self, field: &str, presence: Presence) -> Option<Vec<i64>> {
        let value = self.value(field, presence)?;
        let items = match value {
            Value::Array(items) => items,
            other => {
                self.fail(
                    field,
                    format!("Expected a list of items but got type \"{}\".", json_type(other)),
                );
                return None;
            }
        };

        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let id = match item {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            match id {
                Some(id) => {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                None => {
                    self.fail(
                        field,
                        format!("Incorrect type. Expected pk value, received {}.", json_type(item)),
                    );
                    return None;
                }
            }
        }
        Some(ids)
    }

    /// Attach an error found by a caller-side check
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.fail(field, message);
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid input", Some(self.errors)))
        }
    }
}

fn check_precision(value: &Decimal, limits: DecimalLimits) -> Result<(), String> {
    let scale = value.scale();
    let digits = value.mantissa().unsigned_abs().to_string().len() as u32;
    let total = digits.max(scale);
    let whole = total - scale;

    if total > limits.max_digits {
        return Err(format!(
            "Ensure that there are no more than {} digits in total.",
            limits.max_digits
        ));
    }
    if scale > limits.decimal_places {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            limits.decimal_places
        ));
    }
    if whole > limits.max_digits - limits.decimal_places {
        return Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            limits.max_digits - limits.decimal_places
        ));
    }
    Ok(())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
