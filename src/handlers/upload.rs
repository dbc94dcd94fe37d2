//! CSV bulk upload: multipart file field, parsed row-by-row with the first
//! row as field names, then forwarded to the batch insert path.
//!
//! All rows are accumulated before dispatch; the batch insert is transactional
//! so a failing row never leaves a partial upload behind.

use crate::config::{FieldType, TableHandle};
use crate::error::AppError;
use crate::extractors::TableCtx;
use crate::service::{empty_csv_message, TableStore};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::{Map, Value};

/// POST /ds/{database}/{table}/upload
pub async fn upload_csv(
    State(state): State<AppState>,
    ctx: TableCtx,
    mut multipart: Multipart,
) -> Result<Json<Vec<Value>>, AppError> {
    let mut data: Option<Vec<u8>> = None;
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let Some(field) = field else { break };
        if matches!(field.name(), Some("file" | "csv")) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            data = Some(bytes.to_vec());
            break;
        }
    }
    let data = data.ok_or_else(|| {
        AppError::BadRequest("missing 'file' or 'csv' field in multipart body".into())
    })?;

    let records = parse_csv(&ctx.handle, &data)?;
    if records.is_empty() {
        return Err(AppError::BadRequest(empty_csv_message(&ctx.handle)));
    }

    let inserted = TableStore::insert_many(&state.pool, &ctx.handle, &records).await?;
    Ok(Json(inserted))
}

fn parse_csv(handle: &TableHandle, data: &[u8]) -> Result<Vec<Map<String, Value>>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);
    let headers = reader
        .headers()
        .map_err(|e| parse_error(handle, &e))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| parse_error(handle, &e))?;
        let mut record = Map::new();
        for (i, field_name) in headers.iter().enumerate() {
            let cell = row.get(i).unwrap_or("");
            record.insert(field_name.to_string(), coerce_cell(handle, field_name, cell));
        }
        records.push(record);
    }
    Ok(records)
}

fn parse_error(handle: &TableHandle, e: &csv::Error) -> AppError {
    AppError::BadRequest(format!(
        "Error parsing csv for database name \"{}\" table name \"{}\": {}",
        handle.database, handle.name, e
    ))
}

/// Coerce a CSV cell to the column's declared type. Cells that do not parse
/// are kept as strings so the payload validator reports them as 422.
fn coerce_cell(handle: &TableHandle, field_name: &str, cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    let Some(column) = handle.column(field_name) else {
        return Value::String(cell.to_string());
    };
    match column.type_ {
        FieldType::Integer | FieldType::BigInt => {
            if let Ok(n) = cell.parse::<i64>() {
                return Value::Number(n.into());
            }
        }
        FieldType::Float | FieldType::Double => {
            if let Ok(f) = cell.parse::<f64>() {
                if let Some(n) = serde_json::Number::from_f64(f) {
                    return Value::Number(n);
                }
            }
        }
        FieldType::Boolean => {
            if cell.eq_ignore_ascii_case("true") {
                return Value::Bool(true);
            }
            if cell.eq_ignore_ascii_case("false") {
                return Value::Bool(false);
            }
        }
        FieldType::Json => {
            if let Ok(v) = serde_json::from_str::<Value>(cell) {
                return v;
            }
        }
        _ => {}
    }
    Value::String(cell.to_string())
}
