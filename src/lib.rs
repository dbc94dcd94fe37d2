//! Datastore gateway: configuration-driven REST CRUD over PostgreSQL.
//!
//! A startup configuration declares logical databases and tables with
//! field-level metadata. The gateway builds an immutable registry from it,
//! synchronizes the physical schema, and serves `/ds/...` CRUD routes where
//! every handler is a single store call behind a database/table validation
//! gate and a fixed error-translation table.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{resolve, validate, GatewayConfig, Registry, TableHandle};
pub use error::{AppError, ConfigError};
pub use routes::{common_routes, ds_routes};
pub use service::TableStore;
pub use state::AppState;
pub use store::{connect, ensure_database_exists, sync_schema};

use std::sync::Arc;

/// Resolve the registry, connect the pool, and sync the physical schema.
/// Call once before serving; the returned state is immutable thereafter.
pub async fn build_state(config: &GatewayConfig) -> Result<AppState, AppError> {
    let registry = Arc::new(config::resolve(config)?);
    store::ensure_database_exists(&config.db_opts).await?;
    let pool = store::connect(&config.db_opts).await?;
    if config.db_opts.sync {
        store::sync_schema(&pool, &registry).await?;
    }
    Ok(AppState { pool, registry })
}

/// Full router: /ds datastore routes plus common health/version routes.
pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .merge(routes::common_routes())
        .merge(routes::ds_routes(state))
}
