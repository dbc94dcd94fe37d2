//! Validation gate: resolve `database`/`table` path parameters against the
//! registry before any handler body runs. Pure lookup, no side effects.
//!
//! Routes without these parameters never construct the extractors and so
//! bypass the gate entirely.

use crate::config::{DatabaseEntry, TableHandle};
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    RequestPartsExt,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Request context for routes carrying only a `database` parameter.
#[derive(Clone, Debug)]
pub struct DatabaseCtx {
    pub name: String,
    pub database: DatabaseEntry,
}

/// Request context for routes carrying `database` and `table` parameters.
/// Holds the resolved table handle for the handler to consume directly.
#[derive(Clone, Debug)]
pub struct TableCtx {
    pub handle: Arc<TableHandle>,
}

async fn path_params(parts: &mut Parts) -> Result<HashMap<String, String>, AppError> {
    let Path(params) = parts
        .extract::<Path<HashMap<String, String>>>()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(params)
}

#[async_trait]
impl FromRequestParts<AppState> for DatabaseCtx {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let params = path_params(parts).await?;
        let name = params.get("database").cloned().unwrap_or_default();
        let database = state
            .registry
            .database(&name)
            .cloned()
            .ok_or_else(|| AppError::BadRequest(format!("Invalid database name {}", name)))?;
        Ok(DatabaseCtx { name, database })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for TableCtx {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let params = path_params(parts).await?;
        let database = params.get("database").cloned().unwrap_or_default();
        let table = params.get("table").cloned().unwrap_or_default();
        let entry = state
            .registry
            .database(&database)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid database name {}", database)))?;
        let handle = entry
            .tables
            .get(&table)
            .cloned()
            .ok_or_else(|| AppError::BadRequest(format!("Invalid table name {}", table)))?;
        Ok(TableCtx { handle })
    }
}
