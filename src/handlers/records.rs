//! Record CRUD handlers: each one extracts its inputs, makes exactly one
//! store call, and maps the outcome to a response. No business logic here.

use crate::config::{FieldType, TableHandle};
use crate::error::AppError;
use crate::extractors::TableCtx;
use crate::service::{invalid_payload_message, TableStore};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Map, Value};

/// Parse a path id according to the table's primary-key type.
pub(crate) fn parse_id(handle: &TableHandle, id: &str) -> Result<Value, AppError> {
    Ok(match handle.pk_type {
        FieldType::Integer | FieldType::BigInt => {
            let n: i64 = id
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid id {}", id)))?;
            Value::Number(n.into())
        }
        FieldType::Uuid => {
            let u = uuid::Uuid::parse_str(id)
                .map_err(|_| AppError::BadRequest(format!("Invalid id {}", id)))?;
            Value::String(u.to_string())
        }
        _ => Value::String(id.to_string()),
    })
}

fn record_from_body(handle: &TableHandle, body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadData(invalid_payload_message(handle))),
    }
}

/// GET /ds/{database}/{table}
pub async fn list(
    State(state): State<AppState>,
    ctx: TableCtx,
) -> Result<Json<Vec<Value>>, AppError> {
    let recs = TableStore::find(&state.pool, &ctx.handle).await?;
    Ok(Json(recs))
}

/// GET /ds/{database}/{table}/count
pub async fn count(
    State(state): State<AppState>,
    ctx: TableCtx,
) -> Result<Json<Value>, AppError> {
    let count = TableStore::count(&state.pool, &ctx.handle).await?;
    Ok(Json(json!({ "count": count })))
}

/// GET /ds/{database}/{table}/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ctx: TableCtx,
    Path((database, table, id)): Path<(String, String, String)>,
) -> Result<Json<Value>, AppError> {
    let key = parse_id(&ctx.handle, &id)?;
    let rec = TableStore::find_by_id(&state.pool, &ctx.handle, &key)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Error finding id \"{}\" from database name {} and table name {}",
                id, database, table
            ))
        })?;
    Ok(Json(json!({ "rec": rec })))
}

/// POST /ds/{database}/{table}
pub async fn insert_one(
    State(state): State<AppState>,
    ctx: TableCtx,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let record = record_from_body(&ctx.handle, body)?;
    let inserted = TableStore::insert_one(&state.pool, &ctx.handle, &record).await?;
    Ok(Json(inserted))
}

/// POST /ds/{database}/{table}/batch
pub async fn insert_many(
    State(state): State<AppState>,
    ctx: TableCtx,
    Json(body): Json<Value>,
) -> Result<Json<Vec<Value>>, AppError> {
    let records: Vec<Map<String, Value>> = match body {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(record_from_body(&ctx.handle, item)?);
            }
            out
        }
        _ => return Err(AppError::BadData(invalid_payload_message(&ctx.handle))),
    };
    let inserted = TableStore::insert_many(&state.pool, &ctx.handle, &records).await?;
    Ok(Json(inserted))
}

/// DELETE /ds/{database}/{table}/{id}
pub async fn delete_by_id(
    State(state): State<AppState>,
    ctx: TableCtx,
    Path((database, table, id)): Path<(String, String, String)>,
) -> Result<Json<Value>, AppError> {
    let key = parse_id(&ctx.handle, &id)?;
    let deleted = TableStore::delete_by_id(&state.pool, &ctx.handle, &key).await?;
    if deleted == 0 {
        return Err(AppError::NotFound(format!(
            "Error deleting id \"{}\" from database name {} and table name {}",
            id, database, table
        )));
    }
    Ok(Json(json!({ "deleted": deleted })))
}

/// DELETE /ds/{database}/{table}
pub async fn delete_all(
    State(state): State<AppState>,
    ctx: TableCtx,
) -> Result<Json<Value>, AppError> {
    TableStore::delete_many(&state.pool, &ctx.handle).await?;
    Ok(Json(json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, GatewayConfig};

    fn handle_with_pk(type_: &str) -> std::sync::Arc<TableHandle> {
        let config: GatewayConfig = serde_json::from_value(json!({
            "dbs": {
                "d": { "tables": { "t": { "id": { "type": type_, "primaryKey": true } } } }
            }
        }))
        .unwrap();
        resolve(&config).unwrap().table("d", "t").unwrap().clone()
    }

    #[test]
    fn parse_id_by_pk_type() {
        let h = handle_with_pk("integer");
        assert_eq!(parse_id(&h, "42").unwrap(), json!(42));
        assert!(parse_id(&h, "forty-two").is_err());

        let h = handle_with_pk("string");
        assert_eq!(parse_id(&h, "Acme").unwrap(), json!("Acme"));

        let h = handle_with_pk("uuid");
        assert!(parse_id(&h, "not-a-uuid").is_err());
        assert!(parse_id(&h, "8c4f0f6e-6f2e-4b83-9c2b-5a4f8e21d1aa").is_ok());
    }
}
