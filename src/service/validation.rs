//! Record shape validation against the configured column metadata.
//!
//! Runs before any INSERT so malformed payloads fail with 422 instead of
//! surfacing as a store error. Returns plain reason strings; the caller owns
//! the HTTP-facing message.

use crate::config::{ColumnInfo, FieldType, TableHandle};
use serde_json::{Map, Value};

pub struct RecordValidator;

impl RecordValidator {
    /// Validate one record: known fields only, primary key present, values
    /// matching their declared type, string lengths within bounds.
    pub fn validate(handle: &TableHandle, record: &Map<String, Value>) -> Result<(), String> {
        for key in record.keys() {
            if handle.column(key).is_none() {
                return Err(format!("unknown field '{}'", key));
            }
        }
        match record.get(&handle.pk) {
            None | Some(Value::Null) => {
                return Err(format!("missing primary key '{}'", handle.pk));
            }
            Some(_) => {}
        }
        for c in &handle.columns {
            if let Some(v) = record.get(&c.name) {
                if v.is_null() {
                    continue;
                }
                check_value(c, v)?;
            }
        }
        Ok(())
    }
}

fn check_value(c: &ColumnInfo, v: &Value) -> Result<(), String> {
    match c.type_ {
        FieldType::String | FieldType::Text => {
            let Some(s) = v.as_str() else {
                return Err(type_mismatch(c, "string"));
            };
            if let Some(max) = c.length {
                if s.chars().count() > max as usize {
                    return Err(format!(
                        "field '{}' exceeds maximum length {}",
                        c.name, max
                    ));
                }
            }
        }
        FieldType::Integer | FieldType::BigInt => {
            if v.as_i64().is_none() {
                return Err(type_mismatch(c, "integer"));
            }
        }
        FieldType::Float | FieldType::Double => {
            if !v.is_number() {
                return Err(type_mismatch(c, "number"));
            }
        }
        FieldType::Boolean => {
            if !v.is_boolean() {
                return Err(type_mismatch(c, "boolean"));
            }
        }
        FieldType::Date => {
            let ok = v
                .as_str()
                .map(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok())
                .unwrap_or(false);
            if !ok {
                return Err(type_mismatch(c, "RFC 3339 date string"));
            }
        }
        FieldType::Uuid => {
            let ok = v
                .as_str()
                .map(|s| uuid::Uuid::parse_str(s).is_ok())
                .unwrap_or(false);
            if !ok {
                return Err(type_mismatch(c, "uuid string"));
            }
        }
        FieldType::Json => {}
    }
    Ok(())
}

fn type_mismatch(c: &ColumnInfo, expected: &str) -> String {
    format!("field '{}' must be a {}", c.name, expected)
}
