use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use rust_atelier::api::create_api_router;
use rust_atelier::entities::setup_schema;

// Single connection, otherwise every pooled connection gets its own
// in-memory database.
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to in-memory sqlite");
    setup_schema(&db).await;
    Arc::new(db)
}

pub async fn test_app() -> (Router, Arc<DatabaseConnection>) {
    let db = setup_db().await;
    (create_api_router(db.clone()), db)
}

pub async fn request(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .oneshot(builder.body(body).expect("Failed to build request"))
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };

    (status, value)
}
