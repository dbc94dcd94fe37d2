//! Raw config types matching the JSON configuration surface.
//!
//! Field names follow the original camelCase wire format (`dbOpts`,
//! `primaryKey`), so existing configuration files load unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_port() -> u16 {
    5432
}

fn default_database() -> String {
    "postgres".into()
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

/// Connection options for the backing PostgreSQL server.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbOptions {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Physical PostgreSQL database; logical databases map to schemas inside it.
    #[serde(default = "default_database")]
    pub database: String,
    /// Full connection URL; takes precedence over the discrete fields.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Create schemas/tables from config at startup.
    #[serde(default = "default_true")]
    pub sync: bool,
}

impl Default for DbOptions {
    fn default() -> Self {
        DbOptions {
            host: None,
            port: default_port(),
            username: None,
            password: None,
            database: default_database(),
            url: None,
            max_connections: default_max_connections(),
            sync: true,
        }
    }
}

/// One column: type name, optional length (string only), primary-key flag.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub primary_key: bool,
}

/// Table: ordered map of field name to field definition.
pub type TableConfig = BTreeMap<String, FieldConfig>;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub tables: BTreeMap<String, TableConfig>,
}

/// Startup configuration: connection options plus declared databases/tables.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(default)]
    pub db_opts: DbOptions,
    pub dbs: BTreeMap<String, DatabaseConfig>,
}
