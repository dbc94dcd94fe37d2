//! Builds parameterized SELECT, INSERT, DELETE from a table handle.
//! Identifiers come from config only; request values always bind as parameters.

use crate::config::TableHandle;
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from config).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Schema-qualified table name; the logical database is the schema.
fn qualified_table(handle: &TableHandle) -> String {
    format!("{}.{}", quoted(&handle.database), quoted(&handle.name))
}

fn select_column_list(handle: &TableHandle) -> String {
    handle
        .columns
        .iter()
        .map(|c| quoted(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// SELECT all rows.
pub fn select_all(handle: &TableHandle) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {}",
        select_column_list(handle),
        qualified_table(handle)
    );
    q
}

/// SELECT COUNT(*).
pub fn count_all(handle: &TableHandle) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", qualified_table(handle));
    q
}

/// SELECT by primary key. Caller provides the id as the sole param.
pub fn select_by_id(handle: &TableHandle, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id.clone());
    let cast = handle.pk_type.cast().unwrap_or("");
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}{}",
        select_column_list(handle),
        qualified_table(handle),
        quoted(&handle.pk),
        n,
        cast
    );
    q
}

/// INSERT: only columns present in the record; RETURNING the full column list.
/// Every typed column gets a SQL cast pinning its placeholder to the declared
/// type.
pub fn insert(handle: &TableHandle, record: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in &handle.columns {
        let Some(val) = record.get(&c.name) else {
            continue;
        };
        let n = q.push_param(val.clone());
        let cast = c.type_.cast().unwrap_or("");
        cols.push(quoted(&c.name));
        placeholders.push(format!("${}{}", n, cast));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        qualified_table(handle),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(handle)
    );
    q
}

/// DELETE by primary key; caller inspects rows_affected.
pub fn delete_by_id(handle: &TableHandle, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(id.clone());
    let cast = handle.pk_type.cast().unwrap_or("");
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}{}",
        qualified_table(handle),
        quoted(&handle.pk),
        n,
        cast
    );
    q
}

/// DELETE all rows.
pub fn delete_all(handle: &TableHandle) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("DELETE FROM {}", qualified_table(handle));
    q
}
