use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::entities::product::{self, Entity as ProductEntity};
use crate::middleware::logging::ApiError;
use crate::orders::reconcile_after_product_deletion;

//ROUTERS
pub fn product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/product", get(list_products).post(create_product))
        .route(
            "/product/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .layer(Extension(db))
}

//ROUTES
async fn list_products(
    Query(params): Query<ListProductsQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    let mut condition = Condition::all();
    if let Some(category) = params.category {
        condition = condition.add(product::Column::Category.eq(category));
    }
    if params.is_active.unwrap_or(true) {
        condition = condition.add(product::Column::IsActive.eq(true));
    }

    let limit = params.limit.unwrap_or(50);
    let skip = params.skip.unwrap_or(0);

    let total = match ProductEntity::find()
        .filter(condition.clone())
        .count(&txn)
        .await
    {
        Ok(total) => total,
        Err(err) => return ApiError::Db(err.to_string()).into_response(),
    };

    let result = ProductEntity::find()
        .filter(condition)
        .order_by_desc(product::Column::CreatedAt)
        .limit(limit)
        .offset(skip)
        .all(&txn)
        .await;

    match result {
        Ok(items) => (StatusCode::OK, Json(json!({ "items": items, "total": total })))
            .into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn get_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let result = ProductEntity::find_by_id(id).one(db.as_ref()).await;

    match result {
        Ok(Some(prod)) => (StatusCode::OK, Json(prod)).into_response(),
        Ok(None) => ApiError::NotFound("Product".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn create_product(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateProduct>,
) -> Response {
    if let Err(err) = payload.validate() {
        return ApiError::Validation(err.to_string()).into_response();
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    let now = Utc::now();
    let new_product = product::ActiveModel {
        name: Set(payload.name),
        slug: Set(payload.slug),
        description: Set(payload.description),
        base_price: Set(payload.base_price),
        category: Set(payload.category),
        tags: Set(json!(payload.tags.unwrap_or_default())),
        color: Set(payload.color),
        image: Set(payload.image),
        is_featured: Set(payload.is_featured.unwrap_or(false)),
        is_active: Set(payload.is_active.unwrap_or(true)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_product.insert(&txn).await {
        Ok(model) => match txn.commit().await {
            Ok(_) => (StatusCode::CREATED, Json(model)).into_response(),
            Err(err) => ApiError::Db(err.to_string()).into_response(),
        },
        Err(err) => {
            let _ = txn.rollback().await;
            ApiError::Db(err.to_string()).into_response()
        }
    }
}

async fn update_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<UpdateProduct>,
) -> Response {
    if let Err(err) = payload.validate() {
        return ApiError::Validation(err.to_string()).into_response();
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    let result = ProductEntity::find_by_id(id).one(&txn).await;
    match result {
        Ok(Some(prod)) => {
            let mut prod: product::ActiveModel = prod.into();

            if let Some(name) = payload.name {
                prod.name = Set(name);
            }
            if let Some(slug) = payload.slug {
                prod.slug = Set(slug);
            }
            if let Some(description) = payload.description {
                prod.description = Set(description);
            }
            if let Some(base_price) = payload.base_price {
                prod.base_price = Set(base_price);
            }
            if let Some(category) = payload.category {
                prod.category = Set(category);
            }
            if let Some(tags) = payload.tags {
                prod.tags = Set(json!(tags));
            }
            if let Some(color) = payload.color {
                prod.color = Set(color);
            }
            if let Some(image) = payload.image {
                prod.image = Set(image);
            }
            if let Some(is_featured) = payload.is_featured {
                prod.is_featured = Set(is_featured);
            }
            if let Some(is_active) = payload.is_active {
                prod.is_active = Set(is_active);
            }
            prod.updated_at = Set(Utc::now());

            match prod.update(&txn).await {
                Ok(updated) => match txn.commit().await {
                    Ok(_) => (StatusCode::OK, Json(updated)).into_response(),
                    Err(err) => ApiError::Db(err.to_string()).into_response(),
                },
                Err(err) => {
                    let _ = txn.rollback().await;
                    ApiError::Db(err.to_string()).into_response()
                }
            }
        }
        Ok(None) => ApiError::NotFound("Product".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

/// Deletes the product, then scrubs it out of every still-editable order
/// inside the same transaction. A reconciliation failure rolls the whole
/// deletion back, so orders never reference a product that is gone.
async fn delete_product(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    let result = ProductEntity::find_by_id(id).one(&txn).await;
    match result {
        Ok(Some(prod)) => {
            let prod: product::ActiveModel = prod.into();
            if let Err(err) = prod.delete(&txn).await {
                let _ = txn.rollback().await;
                return ApiError::Db(err.to_string()).into_response();
            }

            if let Err(err) = reconcile_after_product_deletion(&txn, id).await {
                let _ = txn.rollback().await;
                return ApiError::Db(err.to_string()).into_response();
            }

            match txn.commit().await {
                Ok(_) => (StatusCode::OK, Json(json!({ "deleted": true }))).into_response(),
                Err(err) => ApiError::Db(err.to_string()).into_response(),
            }
        }
        Ok(None) => ApiError::NotFound("Product".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

//Structs
#[derive(Deserialize)]
struct ListProductsQuery {
    category: Option<i32>,
    is_active: Option<bool>,
    limit: Option<u64>,
    skip: Option<u64>,
}

#[derive(Deserialize, Validate, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct CreateProduct {
    #[validate(length(min = 1))]
    name: String,
    #[validate(length(min = 1))]
    slug: String,
    description: String,
    #[validate(range(min = 0.0))]
    base_price: f32,
    category: i32,
    tags: Option<Vec<String>>,
    color: String,
    image: String,
    is_featured: Option<bool>,
    is_active: Option<bool>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateProduct {
    #[validate(length(min = 1))]
    name: Option<String>,
    #[validate(length(min = 1))]
    slug: Option<String>,
    description: Option<String>,
    #[validate(range(min = 0.0))]
    base_price: Option<f32>,
    category: Option<i32>,
    tags: Option<Vec<String>>,
    color: Option<String>,
    image: Option<String>,
    is_featured: Option<bool>,
    is_active: Option<bool>,
}
