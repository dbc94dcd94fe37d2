//! Build the resolved registry from raw config; load config from JSON.

use crate::config::resolved::{ColumnInfo, DatabaseEntry, FieldType, Registry, TableHandle};
use crate::config::{validate, GatewayConfig};
use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Build the immutable registry from full config (validates first).
pub fn resolve(config: &GatewayConfig) -> Result<Registry, ConfigError> {
    validate(config)?;

    let mut databases = BTreeMap::new();
    for (db_name, db) in &config.dbs {
        let mut tables = BTreeMap::new();
        for (table_name, table) in &db.tables {
            let columns: Vec<ColumnInfo> = table
                .iter()
                .map(|(field_name, field)| ColumnInfo {
                    name: field_name.clone(),
                    // validate() guarantees the type name parses
                    type_: FieldType::parse(&field.type_).unwrap_or(FieldType::Text),
                    length: field.length,
                    primary_key: field.primary_key,
                })
                .collect();
            let pk = columns
                .iter()
                .find(|c| c.primary_key)
                .map(|c| (c.name.clone(), c.type_))
                .ok_or_else(|| ConfigError::PrimaryKey {
                    database: db_name.clone(),
                    table: table_name.clone(),
                })?;
            let handle = TableHandle {
                database: db_name.clone(),
                name: table_name.clone(),
                columns,
                pk: pk.0,
                pk_type: pk.1,
            };
            tables.insert(table_name.clone(), Arc::new(handle));
        }
        databases.insert(db_name.clone(), DatabaseEntry { tables });
    }

    Ok(Registry { databases })
}

impl GatewayConfig {
    pub fn from_json(json: &str) -> Result<GatewayConfig, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<GatewayConfig, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
        GatewayConfig::from_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GatewayConfig {
        serde_json::from_value(serde_json::json!({
            "dbs": {
                "test_db": {
                    "tables": {
                        "supplier": {
                            "name": { "type": "string", "length": 40, "primaryKey": true },
                            "address_street": { "type": "string", "length": 255 },
                            "address_city": { "type": "string", "length": 40 }
                        }
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn resolves_registry() {
        let registry = resolve(&sample()).unwrap();
        assert_eq!(registry.database_names(), vec!["test_db"]);
        let db = registry.database("test_db").unwrap();
        assert_eq!(db.table_names(), vec!["supplier"]);

        let handle = registry.table("test_db", "supplier").unwrap();
        assert_eq!(handle.database, "test_db");
        assert_eq!(handle.name, "supplier");
        assert_eq!(handle.pk, "name");
        assert_eq!(handle.pk_type, FieldType::String);
        assert_eq!(handle.columns.len(), 3);
    }

    #[test]
    fn unknown_lookups_return_none() {
        let registry = resolve(&sample()).unwrap();
        assert!(registry.database("nope").is_none());
        assert!(registry.table("test_db", "nope").is_none());
        assert!(registry.table("nope", "supplier").is_none());
    }

    #[test]
    fn describe_echoes_field_metadata() {
        let registry = resolve(&sample()).unwrap();
        let schema = registry.table("test_db", "supplier").unwrap().describe();
        assert_eq!(schema["name"]["type"], "string");
        assert_eq!(schema["name"]["length"], 40);
        assert_eq!(schema["name"]["primaryKey"], true);
        assert!(schema["address_city"].get("primaryKey").is_none());
    }
}
