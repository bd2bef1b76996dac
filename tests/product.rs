mod common;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;
use tokio;

use rust_atelier::entities::order::{self, Entity as OrderEntity, Status};

fn sample_product(name: &str, slug: &str, base_price: f32) -> serde_json::Value {
    json!({
        "name": name,
        "slug": slug,
        "description": "A sample accessory",
        "basePrice": base_price,
        "category": 1,
        "tags": ["summer", "minimal"],
        "color": "gold",
        "image": "product.png"
    })
}

#[tokio::test]
async fn create_and_fetch_product() {
    let (app, _db) = common::test_app().await;

    let (status, body) = common::request(
        app.clone(),
        Method::POST,
        "/api/product",
        Some(sample_product("Marble Charm", "marble-charm", 25.5)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Marble Charm");
    assert_eq!(body["basePrice"], 25.5);
    assert_eq!(body["isActive"], true);
    assert_eq!(body["isFeatured"], false);
    assert_eq!(body["tags"], json!(["summer", "minimal"]));
    let id = body["id"].as_i64().expect("Created product has no id");

    let (status, body) = common::request(
        app,
        Method::GET,
        &format!("/api/product/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "marble-charm");
}

#[tokio::test]
async fn unknown_product_is_404() {
    let (app, _db) = common::test_app().await;

    let (status, body) = common::request(app, Method::GET, "/api/product/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn negative_price_is_rejected() {
    let (app, _db) = common::test_app().await;

    let (status, _body) = common::request(
        app,
        Method::POST,
        "/api/product",
        Some(sample_product("Bad", "bad", -1.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters_inactive_products_by_default() {
    let (app, _db) = common::test_app().await;

    common::request(
        app.clone(),
        Method::POST,
        "/api/product",
        Some(sample_product("Visible", "visible", 10.0)),
    )
    .await;
    let mut hidden = sample_product("Hidden", "hidden", 10.0);
    hidden["isActive"] = json!(false);
    common::request(app.clone(), Method::POST, "/api/product", Some(hidden)).await;

    let (status, body) = common::request(app.clone(), Method::GET, "/api/product", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["name"], "Visible");

    let (status, body) = common::request(
        app,
        Method::GET,
        "/api/product?is_active=false",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let (app, _db) = common::test_app().await;

    let (_, created) = common::request(
        app.clone(),
        Method::POST,
        "/api/product",
        Some(sample_product("Stone Ring", "stone-ring", 12.0)),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = common::request(
        app.clone(),
        Method::PUT,
        &format!("/api/product/{}", id),
        Some(json!({ "basePrice": 15.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["basePrice"], 15.0);
    assert_eq!(body["name"], "Stone Ring");
    assert_eq!(body["color"], "gold");

    let (status, _body) = common::request(
        app,
        Method::PUT,
        "/api/product/999",
        Some(json!({ "basePrice": 15.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_reports_404_for_unknown_product() {
    let (app, _db) = common::test_app().await;

    let (status, _body) = common::request(app, Method::DELETE, "/api/product/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_cascades_into_processing_orders() {
    let (app, db) = common::test_app().await;

    let (_, created) = common::request(
        app.clone(),
        Method::POST,
        "/api/product",
        Some(sample_product("Doomed", "doomed", 10.0)),
    )
    .await;
    let product_id = created["id"].as_i64().unwrap() as i32;

    let items = json!([
        {
            "type": "product",
            "productId": product_id,
            "name": "Doomed",
            "quantity": 1,
            "priceAtPurchase": 10.0,
            "image": "product.png"
        },
        {
            "type": "product",
            "productId": product_id + 1,
            "name": "Survivor",
            "quantity": 2,
            "priceAtPurchase": 20.0,
            "image": "product.png"
        }
    ]);
    let seeded = order::ActiveModel {
        user_id: Set(1),
        items: Set(items),
        status: Set(Status::Processing),
        subtotal: Set(50.0),
        shipping_fee: Set(5.0),
        total: Set(55.0),
        placed_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    }
    .insert(db.as_ref())
    .await
    .expect("Failed to seed order");

    let (status, body) = common::request(
        app.clone(),
        Method::DELETE,
        &format!("/api/product/{}", product_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (status, _body) = common::request(
        app,
        Method::GET,
        &format!("/api/product/{}", product_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let reconciled = OrderEntity::find_by_id(seeded.id)
        .one(db.as_ref())
        .await
        .expect("Lookup failed")
        .expect("Order should still exist");
    assert_eq!(reconciled.subtotal, 40.0);
    assert_eq!(reconciled.total, 45.0);
    let items: serde_json::Value = reconciled.items;
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["name"], "Survivor");
}
