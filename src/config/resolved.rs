//! Resolved registry: config validated and flattened for runtime use.
//!
//! Built once at startup and never mutated afterwards; handlers borrow table
//! handles through `Arc` and perform pure lookups only.

use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Declared column type, mapped onto a PostgreSQL type at sync time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    Text,
    Integer,
    BigInt,
    Float,
    Double,
    Boolean,
    Date,
    Uuid,
    Json,
}

impl FieldType {
    pub fn parse(name: &str) -> Option<FieldType> {
        Some(match name.to_lowercase().as_str() {
            "string" => FieldType::String,
            "text" => FieldType::Text,
            "integer" | "int" => FieldType::Integer,
            "bigint" => FieldType::BigInt,
            "float" => FieldType::Float,
            "double" => FieldType::Double,
            "boolean" | "bool" => FieldType::Boolean,
            "date" => FieldType::Date,
            "uuid" => FieldType::Uuid,
            "json" => FieldType::Json,
            _ => return None,
        })
    }

    /// Config-facing name, used when describing a table schema.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::BigInt => "bigint",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Uuid => "uuid",
            FieldType::Json => "json",
        }
    }

    /// SQL cast suffix pinning the placeholder to the column's declared type.
    /// Needed for values that bind as text (dates, uuids, nulls from CSV
    /// cells); harmless for natively typed binds.
    pub fn cast(&self) -> Option<&'static str> {
        match self {
            FieldType::String | FieldType::Text => None,
            FieldType::Integer => Some("::int4"),
            FieldType::BigInt => Some("::int8"),
            FieldType::Float => Some("::float4"),
            FieldType::Double => Some("::float8"),
            FieldType::Boolean => Some("::boolean"),
            FieldType::Date => Some("::timestamptz"),
            FieldType::Uuid => Some("::uuid"),
            FieldType::Json => Some("::jsonb"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColumnInfo {
    pub name: String,
    pub type_: FieldType,
    pub length: Option<u32>,
    pub primary_key: bool,
}

impl ColumnInfo {
    /// PostgreSQL column type for CREATE TABLE.
    pub fn pg_type(&self) -> String {
        match self.type_ {
            FieldType::String => {
                format!("VARCHAR({})", self.length.unwrap_or(255))
            }
            FieldType::Text => "TEXT".into(),
            FieldType::Integer => "INTEGER".into(),
            FieldType::BigInt => "BIGINT".into(),
            FieldType::Float => "REAL".into(),
            FieldType::Double => "DOUBLE PRECISION".into(),
            FieldType::Boolean => "BOOLEAN".into(),
            FieldType::Date => "TIMESTAMPTZ".into(),
            FieldType::Uuid => "UUID".into(),
            FieldType::Json => "JSONB".into(),
        }
    }
}

/// Capability object for one configured table. Carries everything a handler
/// needs to build queries and error messages: names, columns, primary key.
#[derive(Clone, Debug)]
pub struct TableHandle {
    /// Logical database name (also the PostgreSQL schema name).
    pub database: String,
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub pk: String,
    pub pk_type: FieldType,
}

impl TableHandle {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Schema description for `GET /ds/database/{database}/{table}`.
    pub fn describe(&self) -> Value {
        let mut fields = serde_json::Map::new();
        for c in &self.columns {
            let mut f = serde_json::Map::new();
            f.insert("type".into(), json!(c.type_.name()));
            if let Some(len) = c.length {
                f.insert("length".into(), json!(len));
            }
            if c.primary_key {
                f.insert("primaryKey".into(), json!(true));
            }
            fields.insert(c.name.clone(), Value::Object(f));
        }
        Value::Object(fields)
    }
}

#[derive(Clone, Debug, Default)]
pub struct DatabaseEntry {
    pub tables: BTreeMap<String, Arc<TableHandle>>,
}

impl DatabaseEntry {
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }
}

/// Immutable map of database name to table handles. Shared via `Arc` in
/// `AppState`; the validation gate resolves request path parameters here.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    pub databases: BTreeMap<String, DatabaseEntry>,
}

impl Registry {
    pub fn database_names(&self) -> Vec<&str> {
        self.databases.keys().map(String::as_str).collect()
    }

    pub fn database(&self, name: &str) -> Option<&DatabaseEntry> {
        self.databases.get(name)
    }

    pub fn table(&self, database: &str, table: &str) -> Option<&Arc<TableHandle>> {
        self.databases.get(database)?.tables.get(table)
    }
}
