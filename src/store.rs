//! Pool construction and physical schema sync.
//!
//! Each logical database becomes a PostgreSQL schema inside the one physical
//! database named by `DbOptions::database`; each configured table becomes a
//! table in that schema. Sync runs once before the server accepts traffic.

use crate::config::{DbOptions, Registry};
use crate::error::{AppError, ConfigError};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn connect_options(opts: &DbOptions) -> Result<PgConnectOptions, AppError> {
    if let Some(url) = &opts.url {
        return PgConnectOptions::from_str(url)
            .map_err(|e| ConfigError::Load(format!("invalid database url: {}", e)).into());
    }
    let mut o = PgConnectOptions::new()
        .port(opts.port)
        .database(&opts.database);
    if let Some(host) = &opts.host {
        o = o.host(host);
    }
    if let Some(user) = &opts.username {
        o = o.username(user);
    }
    if let Some(password) = &opts.password {
        o = o.password(password);
    }
    Ok(o)
}

/// Connect the shared pool from config.
pub async fn connect(opts: &DbOptions) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(opts.max_connections)
        .connect_with(connect_options(opts)?)
        .await?;
    Ok(pool)
}

/// Ensure the physical database exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before `connect`.
pub async fn ensure_database_exists(opts: &DbOptions) -> Result<(), AppError> {
    let target = connect_options(opts)?;
    let db_name = target.get_database().unwrap_or("").to_string();
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let admin = target.database("postgres");
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Create schemas and tables for everything in the registry. Idempotent.
pub async fn sync_schema(pool: &PgPool, registry: &Registry) -> Result<(), AppError> {
    for (db_name, db) in &registry.databases {
        let schema = quote(db_name);
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
            .execute(pool)
            .await?;

        for handle in db.tables.values() {
            let mut col_defs: Vec<String> = handle
                .columns
                .iter()
                .map(|c| format!("{} {}", quote(&c.name), c.pg_type()))
                .collect();
            col_defs.push(format!("PRIMARY KEY ({})", quote(&handle.pk)));

            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {}.{} (\n  {}\n)",
                schema,
                quote(&handle.name),
                col_defs.join(",\n  ")
            );
            tracing::debug!(sql = %ddl, "sync");
            sqlx::query(&ddl).execute(pool).await?;
        }
    }
    Ok(())
}
