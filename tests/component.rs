mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tokio;

#[tokio::test]
async fn component_crud_round_trip() {
    let (app, _db) = common::test_app().await;

    let (status, body) = common::request(
        app.clone(),
        Method::POST,
        "/api/component",
        Some(json!({
            "name": "Marble Bead",
            "type": "marble",
            "price": 3.5,
            "image": "bead.png"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().expect("Created component has no id");

    let (status, body) = common::request(
        app.clone(),
        Method::GET,
        &format!("/api/component/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Marble Bead");
    assert_eq!(body["type"], "marble");
    assert_eq!(body["price"], 3.5);

    let (status, body) = common::request(
        app.clone(),
        Method::PUT,
        &format!("/api/component/{}", id),
        Some(json!({ "price": 4.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 4.0);
    assert_eq!(body["type"], "marble");

    let (status, body) = common::request(
        app.clone(),
        Method::DELETE,
        &format!("/api/component/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _body) = common::request(
        app,
        Method::GET,
        &format!("/api/component/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn negative_component_price_is_rejected() {
    let (app, _db) = common::test_app().await;

    let (status, _body) = common::request(
        app,
        Method::POST,
        "/api/component",
        Some(json!({
            "name": "Broken",
            "type": "stone",
            "price": -2.0,
            "image": "bead.png"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
