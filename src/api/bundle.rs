use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::entities::bundle::{self, Entity as BundleEntity};
use crate::entities::product::{self, Entity as ProductEntity};
use crate::middleware::logging::ApiError;

//ROUTERS
pub fn bundle_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/bundle", get(list_bundles).post(create_bundle))
        .route(
            "/bundle/:id",
            get(get_bundle).put(update_bundle).delete(delete_bundle),
        )
        .layer(Extension(db))
}

//ROUTES
async fn list_bundles(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    let bundles = match BundleEntity::find().all(&txn).await {
        Ok(bundles) => bundles,
        Err(err) => return ApiError::Db(err.to_string()).into_response(),
    };

    let mut response = Vec::with_capacity(bundles.len());
    for bundle in bundles {
        let original_price = match original_price_of(&txn, &bundle).await {
            Ok(price) => price,
            Err(err) => return ApiError::Db(err.to_string()).into_response(),
        };
        response.push(BundleResponse {
            bundle,
            original_price,
        });
    }

    (StatusCode::OK, Json(response)).into_response()
}

async fn get_bundle(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match BundleEntity::find_by_id(id).one(&txn).await {
        Ok(Some(bundle)) => match original_price_of(&txn, &bundle).await {
            Ok(original_price) => (
                StatusCode::OK,
                Json(BundleResponse {
                    bundle,
                    original_price,
                }),
            )
                .into_response(),
            Err(err) => ApiError::Db(err.to_string()).into_response(),
        },
        Ok(None) => ApiError::NotFound("Bundle".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn create_bundle(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateBundle>,
) -> Response {
    if let Err(err) = payload.validate() {
        return ApiError::Validation(err.to_string()).into_response();
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    let new_bundle = bundle::ActiveModel {
        name: Set(payload.name),
        slug: Set(payload.slug),
        description: Set(payload.description),
        product_ids: Set(json!(payload.product_ids)),
        price: Set(payload.price),
        image: Set(payload.image),
        expire: Set(payload.expire),
        ..Default::default()
    };

    match new_bundle.insert(&txn).await {
        Ok(model) => match txn.commit().await {
            Ok(_) => (StatusCode::CREATED, Json(json!({ "id": model.id }))).into_response(),
            Err(err) => ApiError::Db(err.to_string()).into_response(),
        },
        Err(err) => {
            let _ = txn.rollback().await;
            ApiError::Db(err.to_string()).into_response()
        }
    }
}

async fn update_bundle(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<UpdateBundle>,
) -> Response {
    if let Err(err) = payload.validate() {
        return ApiError::Validation(err.to_string()).into_response();
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match BundleEntity::find_by_id(id).one(&txn).await {
        Ok(Some(bundle)) => {
            let mut bundle: bundle::ActiveModel = bundle.into();

            if let Some(name) = payload.name {
                bundle.name = Set(name);
            }
            if let Some(slug) = payload.slug {
                bundle.slug = Set(slug);
            }
            if let Some(description) = payload.description {
                bundle.description = Set(description);
            }
            if let Some(product_ids) = payload.product_ids {
                bundle.product_ids = Set(json!(product_ids));
            }
            if let Some(price) = payload.price {
                bundle.price = Set(price);
            }
            if let Some(image) = payload.image {
                bundle.image = Set(image);
            }
            if let Some(expire) = payload.expire {
                bundle.expire = Set(expire);
            }

            match bundle.update(&txn).await {
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
        Ok(None) => ApiError::NotFound("Bundle".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn delete_bundle(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match BundleEntity::find_by_id(id).one(&txn).await {
        Ok(Some(bundle)) => {
            let bundle: bundle::ActiveModel = bundle.into();
            match bundle.delete(&txn).await {
                Ok(_) => match txn.commit().await {
                    Ok(_) => {
                        (StatusCode::OK, Json(json!({ "success": true }))).into_response()
                    }
                    Err(err) => ApiError::Db(err.to_string()).into_response(),
                },
                Err(err) => {
                    let _ = txn.rollback().await;
                    ApiError::Db(err.to_string()).into_response()
                }
            }
        }
        Ok(None) => ApiError::NotFound("Bundle".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

/// Sum of the base prices of the bundle's constituent products. Computed at
/// read time, never stored; product ids that no longer resolve contribute 0.
async fn original_price_of<C>(conn: &C, bundle: &bundle::Model) -> Result<f32, DbErr>
where
    C: ConnectionTrait,
{
    let ids: Vec<i32> = serde_json::from_value(bundle.product_ids.clone())
        .map_err(|err| DbErr::Json(err.to_string()))?;

    let products = ProductEntity::find()
        .filter(product::Column::Id.is_in(ids))
        .all(conn)
        .await?;

    Ok(products.iter().map(|prod| prod.base_price).sum())
}

//Structs
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BundleResponse {
    #[serde(flatten)]
    bundle: bundle::Model,
    original_price: f32,
}

#[derive(Deserialize, Validate, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct CreateBundle {
    #[validate(length(min = 1))]
    name: String,
    #[validate(length(min = 1))]
    slug: String,
    description: String,
    product_ids: Vec<i32>,
    #[validate(range(min = 0.0))]
    price: f32,
    image: String,
    expire: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateBundle {
    #[validate(length(min = 1))]
    name: Option<String>,
    #[validate(length(min = 1))]
    slug: Option<String>,
    description: Option<String>,
    product_ids: Option<Vec<i32>>,
    #[validate(range(min = 0.0))]
    price: Option<f32>,
    image: Option<String>,
    // missing field leaves expire alone, an explicit null clears it
    #[serde(default)]
    expire: Option<Option<DateTime<Utc>>>,
}
