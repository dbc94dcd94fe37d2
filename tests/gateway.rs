//! Router-level tests for the validation gate, metadata routes, payload
//! validation, and the CSV upload guard. These paths resolve entirely from
//! the registry, so the pool is lazy and never connected.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use datastore_gateway::{resolve, router, AppState, GatewayConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_config() -> GatewayConfig {
    serde_json::from_value(json!({
        "dbOpts": { "host": "localhost", "database": "test_db" },
        "dbs": {
            "test_db": {
                "tables": {
                    "supplier": {
                        "name": { "type": "string", "length": 40, "primaryKey": true },
                        "address_street": { "type": "string", "length": 255 },
                        "address_city": { "type": "string", "length": 40 },
                        "address_postal_code": { "type": "string", "length": 20 },
                        "address_country": { "type": "string", "length": 20 }
                    }
                }
            }
        }
    }))
    .unwrap()
}

fn test_app() -> Router {
    let registry = Arc::new(resolve(&test_config()).unwrap());
    // Lazy pool: these tests only exercise paths that never reach the store.
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://postgres@127.0.0.1:1/test_db")
        .unwrap();
    router(AppState { pool, registry })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap()
}

#[tokio::test]
async fn health_bypasses_gate() {
    let res = test_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["status"], "ok");
}

#[tokio::test]
async fn lists_database_names() {
    let res = test_app()
        .oneshot(Request::get("/ds/database/names").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!(["test_db"]));
}

#[tokio::test]
async fn lists_table_names() {
    let res = test_app()
        .oneshot(
            Request::get("/ds/database/test_db/tables")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!(["supplier"]));
}

#[tokio::test]
async fn table_names_reject_unknown_database() {
    let res = test_app()
        .oneshot(
            Request::get("/ds/database/nope/tables")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(error_message(&body), "Invalid database name nope");
}

#[tokio::test]
async fn describes_table_schema() {
    let res = test_app()
        .oneshot(
            Request::get("/ds/database/test_db/supplier")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["name"]["type"], "string");
    assert_eq!(body["name"]["primaryKey"], true);
    assert_eq!(body["address_city"]["length"], 40);
}

#[tokio::test]
async fn insert_rejects_unknown_database() {
    let res = test_app()
        .oneshot(
            Request::post("/ds/database/table")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(error_message(&body), "Invalid database name database");
}

#[tokio::test]
async fn insert_rejects_unknown_table() {
    let res = test_app()
        .oneshot(
            Request::post("/ds/test_db/table")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(error_message(&body), "Invalid table name table");
}

#[tokio::test]
async fn gate_applies_to_reads_too() {
    let res = test_app()
        .oneshot(Request::get("/ds/nope/supplier").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(error_message(&body), "Invalid database name nope");
}

#[tokio::test]
async fn insert_rejects_record_without_primary_key() {
    let res = test_app()
        .oneshot(
            Request::post("/ds/test_db/supplier")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"address_city":"Springfield"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(
        error_message(&body),
        "Error inserting record into database name \"test_db\" table name \"supplier\" due to invalid payload"
    );
}

#[tokio::test]
async fn insert_rejects_non_object_payload() {
    let res = test_app()
        .oneshot(
            Request::post("/ds/test_db/supplier")
                .header("content-type", "application/json")
                .body(Body::from("[1,2,3]"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn batch_rejects_non_array_payload() {
    let res = test_app()
        .oneshot(
            Request::post("/ds/test_db/supplier/batch")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"Acme"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(
        error_message(&body),
        "Error inserting record into database name \"test_db\" table name \"supplier\" due to invalid payload"
    );
}

fn multipart_request(uri: &str, file_content: &str) -> Request<Body> {
    const BOUNDARY: &str = "test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"data.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{b}--\r\n",
        b = BOUNDARY,
        content = file_content
    );
    Request::post(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_rejects_empty_csv() {
    let res = test_app()
        .oneshot(multipart_request("/ds/test_db/supplier/upload", ""))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(
        error_message(&body),
        "Error inserting records into database name \"test_db\" table name \"supplier\" due to empty csv file"
    );
}

#[tokio::test]
async fn upload_rejects_header_only_csv() {
    let res = test_app()
        .oneshot(multipart_request(
            "/ds/test_db/supplier/upload",
            "name,address_city",
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_requires_file_field() {
    const BOUNDARY: &str = "test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"other\"\r\n\r\n\
         hello\r\n\
         --{b}--\r\n",
        b = BOUNDARY
    );
    let req = Request::post("/ds/test_db/supplier/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_reports_multipart_decode_errors() {
    // Declares a multipart boundary but carries garbage, so field iteration
    // fails; the parser error must surface, not the missing-field message.
    let req = Request::post("/ds/test_db/supplier/upload")
        .header(
            "content-type",
            "multipart/form-data; boundary=test-boundary",
        )
        .body(Body::from("this is not a multipart body"))
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_ne!(
        error_message(&body),
        "missing 'file' or 'csv' field in multipart body"
    );
}

#[tokio::test]
async fn upload_accepts_body_over_default_limit() {
    // A CSV bigger than the 2 MB default body cap must reach the handler;
    // with no database behind the lazy pool the insert then fails upstream.
    let mut csv = String::from("name\n");
    for i in 0..350_000 {
        csv.push_str(&format!("s{:07}\n", i));
    }
    let res = test_app()
        .oneshot(multipart_request("/ds/test_db/supplier/upload", &csv))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(res).await;
    assert_eq!(
        error_message(&body),
        "Error inserting record into database name: test_db table name: supplier due to internal error"
    );
}

#[tokio::test]
async fn upload_rejects_oversized_body() {
    let size = 11 * 1024 * 1024;
    let req = Request::post("/ds/test_db/supplier/upload")
        .header(
            "content-type",
            "multipart/form-data; boundary=test-boundary",
        )
        .header("content-length", size.to_string())
        .body(Body::from(vec![b'a'; size]))
        .unwrap();
    let res = test_app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn upload_applies_gate_before_parsing() {
    let res = test_app()
        .oneshot(multipart_request("/ds/test_db/unknown/upload", "name\nAcme"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_json(res).await;
    assert_eq!(error_message(&body), "Invalid table name unknown");
}
