//! Registry metadata handlers: database names, table names, table schema.
//! Pure registry lookups, no store call.

use crate::extractors::{DatabaseCtx, TableCtx};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde_json::Value;

/// GET /ds/database/names
pub async fn database_names(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .registry
            .database_names()
            .into_iter()
            .map(String::from)
            .collect(),
    )
}

/// GET /ds/database/{database}/tables
pub async fn table_names(ctx: DatabaseCtx) -> Json<Vec<String>> {
    Json(
        ctx.database
            .table_names()
            .into_iter()
            .map(String::from)
            .collect(),
    )
}

/// GET /ds/database/{database}/{table}
pub async fn table_schema(ctx: TableCtx) -> Json<Value> {
    Json(ctx.handle.describe())
}
