//! Store operations against PostgreSQL: one method per gateway operation,
//! each mapping failures through the fixed error-translation table.

use crate::config::TableHandle;
use crate::error::AppError;
use crate::service::RecordValidator;
use crate::sql::{
    count_all, delete_all, delete_by_id, insert, select_all, select_by_id, PgBindValue, QueryBuf,
};
use serde_json::{Map, Value};
use sqlx::PgPool;

/// PostgreSQL error codes treated as payload problems (422).
const PAYLOAD_ERROR_CODES: &[&str] = &["23502", "23514", "22001", "22003", "22P02"];
/// unique_violation
const DUPLICATE_KEY_CODE: &str = "23505";

pub struct TableStore;

impl TableStore {
    /// All rows, in column order defined by config.
    pub async fn find(pool: &PgPool, handle: &TableHandle) -> Result<Vec<Value>, AppError> {
        let q = select_all(handle);
        Self::fetch_all(pool, &q)
            .await
            .map_err(|e| read_error(handle, e))
    }

    pub async fn count(pool: &PgPool, handle: &TableHandle) -> Result<i64, AppError> {
        let q = count_all(handle);
        tracing::debug!(sql = %q.sql, "query");
        sqlx::query_scalar::<_, i64>(&q.sql)
            .fetch_one(pool)
            .await
            .map_err(|e| read_error(handle, e))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        handle: &TableHandle,
        id: &Value,
    ) -> Result<Option<Value>, AppError> {
        let q = select_by_id(handle, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(sqlx::query(&q.sql), &q.params)
            .fetch_optional(pool)
            .await
            .map_err(|e| read_error(handle, e))?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    /// Insert one record; validates shape first. Returns the inserted row.
    pub async fn insert_one(
        pool: &PgPool,
        handle: &TableHandle,
        record: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        if let Err(reason) = RecordValidator::validate(handle, record) {
            tracing::debug!(table = %handle.name, %reason, "payload rejected");
            return Err(AppError::BadData(invalid_payload_message(handle)));
        }
        let q = insert(handle, record);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_params(sqlx::query(&q.sql), &q.params)
            .fetch_one(pool)
            .await
            .map_err(|e| write_error(handle, e))?;
        Ok(row_to_json(&row))
    }

    /// Insert a batch in one transaction; never partially applied.
    pub async fn insert_many(
        pool: &PgPool,
        handle: &TableHandle,
        records: &[Map<String, Value>],
    ) -> Result<Vec<Value>, AppError> {
        for record in records {
            if let Err(reason) = RecordValidator::validate(handle, record) {
                tracing::debug!(table = %handle.name, %reason, "payload rejected");
                return Err(AppError::BadData(invalid_payload_message(handle)));
            }
        }
        let mut tx = pool.begin().await.map_err(|e| write_error(handle, e))?;
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            let q = insert(handle, record);
            tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
            let row = bind_params(sqlx::query(&q.sql), &q.params)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| write_error(handle, e))?;
            out.push(row_to_json(&row));
        }
        tx.commit().await.map_err(|e| write_error(handle, e))?;
        Ok(out)
    }

    /// Delete by primary key; returns the number of rows removed (0 or 1).
    pub async fn delete_by_id(
        pool: &PgPool,
        handle: &TableHandle,
        id: &Value,
    ) -> Result<u64, AppError> {
        let q = delete_by_id(handle, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let result = bind_params(sqlx::query(&q.sql), &q.params)
            .execute(pool)
            .await
            .map_err(|e| delete_error(handle, id, e))?;
        Ok(result.rows_affected())
    }

    /// Delete every row in the table.
    pub async fn delete_many(pool: &PgPool, handle: &TableHandle) -> Result<(), AppError> {
        let q = delete_all(handle);
        tracing::debug!(sql = %q.sql, "query");
        sqlx::query(&q.sql)
            .execute(pool)
            .await
            .map_err(|e| delete_all_error(handle, e))?;
        Ok(())
    }

    async fn fetch_all(pool: &PgPool, q: &QueryBuf) -> Result<Vec<Value>, sqlx::Error> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_params(sqlx::query(&q.sql), &q.params)
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

fn bind_params<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    params: &'q [Value],
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for p in params {
        query = query.bind(PgBindValue::from_json(p));
    }
    query
}

// Message helpers below are the observable HTTP contract; the irregular
// quoting and punctuation match the behavior callers already depend on.

pub(crate) fn invalid_payload_message(handle: &TableHandle) -> String {
    format!(
        "Error inserting record into database name \"{}\" table name \"{}\" due to invalid payload",
        handle.database, handle.name
    )
}

pub(crate) fn duplicate_key_message(handle: &TableHandle) -> String {
    format!(
        "Error inserting record into database name \"{}\" table name \"{}\" due to duplicate key",
        handle.database, handle.name
    )
}

pub(crate) fn insert_internal_message(handle: &TableHandle) -> String {
    format!(
        "Error inserting record into database name: {} table name: {} due to internal error",
        handle.database, handle.name
    )
}

pub(crate) fn empty_csv_message(handle: &TableHandle) -> String {
    format!(
        "Error inserting records into database name \"{}\" table name \"{}\" due to empty csv file",
        handle.database, handle.name
    )
}

fn read_error(handle: &TableHandle, e: sqlx::Error) -> AppError {
    tracing::warn!(table = %handle.name, error = %e, "read failed");
    AppError::BadGateway(format!(
        "Error reading records from table name {}",
        handle.name
    ))
}

/// Fixed write-error translation: unique violation is a conflict, payload
/// class errors are bad data, everything else is an upstream failure.
fn write_error(handle: &TableHandle, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if let Some(code) = db.code() {
            if code == DUPLICATE_KEY_CODE {
                return AppError::Conflict(duplicate_key_message(handle));
            }
            if PAYLOAD_ERROR_CODES.contains(&code.as_ref()) {
                return AppError::BadData(invalid_payload_message(handle));
            }
        }
    }
    tracing::warn!(table = %handle.name, error = %e, "write failed");
    AppError::BadGateway(insert_internal_message(handle))
}

fn delete_error(handle: &TableHandle, id: &Value, e: sqlx::Error) -> AppError {
    tracing::warn!(table = %handle.name, error = %e, "delete failed");
    let id_text = match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    AppError::BadGateway(format!(
        "Error deleting record id {} into database name \"{}\" table name \"{}\"",
        id_text, handle.database, handle.name
    ))
}

fn delete_all_error(handle: &TableHandle, e: sqlx::Error) -> AppError {
    tracing::warn!(table = %handle.name, error = %e, "delete failed");
    AppError::BadGateway(format!(
        "Error deleting records from database name \"{}\" table name \"{}\"",
        handle.database, handle.name
    ))
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n as f64) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}
