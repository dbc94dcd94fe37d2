//! Datastore route table under /ds. Static `database/...` metadata routes
//! take priority over the parameterized record routes.

use crate::handlers::{
    count, database_names, delete_all, delete_by_id, get_by_id, insert_many, insert_one, list,
    table_names, table_schema, upload_csv,
};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn ds_routes(state: AppState) -> Router {
    // The body-limit layers apply on a sub-router, where the service error
    // type stays Infallible; layering a MethodRouter directly leaves it
    // ambiguous.
    let upload = Router::new()
        .route("/ds/:database/:table/upload", post(upload_csv))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(UPLOAD_BODY_LIMIT));
    Router::new()
        .route("/ds/database/names", get(database_names))
        .route("/ds/database/:database/tables", get(table_names))
        .route("/ds/database/:database/:table", get(table_schema))
        .route(
            "/ds/:database/:table",
            get(list).post(insert_one).delete(delete_all),
        )
        .route("/ds/:database/:table/count", get(count))
        .route("/ds/:database/:table/batch", post(insert_many))
        .route(
            "/ds/:database/:table/:id",
            get(get_by_id).delete(delete_by_id),
        )
        .merge(upload)
        .with_state(state)
}
