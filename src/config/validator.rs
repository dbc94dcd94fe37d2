//! Config validation: names, field types, primary keys.

use crate::config::{FieldType, GatewayConfig};
use crate::error::ConfigError;

pub fn validate(config: &GatewayConfig) -> Result<(), ConfigError> {
    for (db_name, db) in &config.dbs {
        if db_name.trim().is_empty() {
            return Err(ConfigError::EmptyName { kind: "database" });
        }
        for (table_name, table) in &db.tables {
            if table_name.trim().is_empty() {
                return Err(ConfigError::EmptyName { kind: "table" });
            }
            let mut pk_count = 0usize;
            for (field_name, field) in table {
                if field_name.trim().is_empty() {
                    return Err(ConfigError::EmptyName { kind: "field" });
                }
                let Some(type_) = FieldType::parse(&field.type_) else {
                    return Err(ConfigError::UnknownFieldType {
                        table: table_name.clone(),
                        field: field_name.clone(),
                        type_name: field.type_.clone(),
                    });
                };
                if field.length.is_some() && type_ != FieldType::String {
                    return Err(ConfigError::InvalidLength {
                        table: table_name.clone(),
                        field: field_name.clone(),
                    });
                }
                if field.primary_key {
                    pk_count += 1;
                }
            }
            if pk_count != 1 {
                return Err(ConfigError::PrimaryKey {
                    database: db_name.clone(),
                    table: table_name.clone(),
                });
            }
        }
    }
    Ok(())
}
