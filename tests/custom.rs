mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tokio;

fn sample_custom() -> serde_json::Value {
    json!({
        "userId": 3,
        "name": "My Bracelet",
        "type": "bracelet",
        "structure": [
            { "name": "Marble Bead", "type": "marble", "price": 3.5, "image": "bead.png" },
            { "name": "Stone Bead", "type": "stone", "price": 2.0, "image": "stone.png" }
        ],
        "status": "private",
        "image": "bracelet.png"
    })
}

#[tokio::test]
async fn custom_accessory_crud_round_trip() {
    let (app, _db) = common::test_app().await;

    let (status, body) = common::request(
        app.clone(),
        Method::POST,
        "/api/custom",
        Some(sample_custom()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().expect("Created custom accessory has no id");

    let (status, body) = common::request(
        app.clone(),
        Method::GET,
        &format!("/api/custom/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "My Bracelet");
    assert_eq!(body["type"], "bracelet");
    assert_eq!(body["status"], "private");
    assert_eq!(body["structure"].as_array().unwrap().len(), 2);
    assert_eq!(body["userId"], 3);

    let (status, body) = common::request(
        app.clone(),
        Method::PUT,
        &format!("/api/custom/{}", id),
        Some(json!({ "status": "public" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "public");
    assert!(!body["updatedAt"].is_null());

    let (status, body) = common::request(
        app.clone(),
        Method::DELETE,
        &format!("/api/custom/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _body) = common::request(
        app,
        Method::GET,
        &format!("/api/custom/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_status_is_rejected() {
    let (app, _db) = common::test_app().await;

    let mut payload = sample_custom();
    payload["status"] = json!("archived");

    let (status, body) = common::request(app, Method::POST, "/api/custom", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Failed to validate: Invalid status: archived");
}
