//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("empty {kind} name")]
    EmptyName { kind: &'static str },
    #[error("unknown field type '{type_name}' for field {field} in table {table}")]
    UnknownFieldType {
        table: String,
        field: String,
        type_name: String,
    },
    #[error("table {table} in database {database} must declare exactly one primary key")]
    PrimaryKey { database: String, table: String },
    #[error("length is only valid for string fields: field {field} in table {table}")]
    InvalidLength { table: String, field: String },
    #[error("config load: {0}")]
    Load(String),
}

/// Gateway error taxonomy. Message strings are part of the HTTP contract;
/// variants that carry a String render it verbatim.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadData(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadGateway(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadData(_) => (StatusCode::UNPROCESSABLE_ENTITY, "bad_data"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "bad_gateway"),
            AppError::Db(_) => (StatusCode::BAD_GATEWAY, "database_error"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
