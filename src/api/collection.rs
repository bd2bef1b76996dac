use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::entities::collection::{self, Entity as CollectionEntity};
use crate::middleware::logging::ApiError;

//ROUTERS
pub fn collection_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/collection", get(list_collections).post(create_collection))
        .route(
            "/collection/:id",
            get(get_collection)
                .put(update_collection)
                .delete(delete_collection),
        )
        .layer(Extension(db))
}

//ROUTES
async fn list_collections(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    match CollectionEntity::find().all(db.as_ref()).await {
        Ok(collections) => (StatusCode::OK, Json(collections)).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn get_collection(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    match CollectionEntity::find_by_id(id).one(db.as_ref()).await {
        Ok(Some(collection)) => (StatusCode::OK, Json(collection)).into_response(),
        Ok(None) => ApiError::NotFound("Collection".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn create_collection(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateCollection>,
) -> Response {
    if let Err(err) = payload.validate() {
        return ApiError::Validation(err.to_string()).into_response();
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    let new_collection = collection::ActiveModel {
        name: Set(payload.name),
        slug: Set(payload.slug),
        description: Set(payload.description),
        product_ids: Set(json!(payload.product_ids)),
        ..Default::default()
    };

    match new_collection.insert(&txn).await {
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

async fn update_collection(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<UpdateCollection>,
) -> Response {
    if let Err(err) = payload.validate() {
        return ApiError::Validation(err.to_string()).into_response();
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match CollectionEntity::find_by_id(id).one(&txn).await {
        Ok(Some(collection)) => {
            let mut collection: collection::ActiveModel = collection.into();

            if let Some(name) = payload.name {
                collection.name = Set(name);
            }
            if let Some(slug) = payload.slug {
                collection.slug = Set(slug);
            }
            if let Some(description) = payload.description {
                collection.description = Set(description);
            }
            if let Some(product_ids) = payload.product_ids {
                collection.product_ids = Set(json!(product_ids));
            }

            match collection.update(&txn).await {
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
        Ok(None) => ApiError::NotFound("Collection".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn delete_collection(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match CollectionEntity::find_by_id(id).one(&txn).await {
        Ok(Some(collection)) => {
            let collection: collection::ActiveModel = collection.into();
            match collection.delete(&txn).await {
                Ok(_) => match txn.commit().await {
                    Ok(_) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
                    Err(err) => ApiError::Db(err.to_string()).into_response(),
                },
                Err(err) => {
                    let _ = txn.rollback().await;
                    ApiError::Db(err.to_string()).into_response()
                }
            }
        }
        Ok(None) => ApiError::NotFound("Collection".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

//Structs
#[derive(Deserialize, Validate, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct CreateCollection {
    #[validate(length(min = 1))]
    name: String,
    #[validate(length(min = 1))]
    slug: String,
    description: String,
    product_ids: Vec<i32>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateCollection {
    #[validate(length(min = 1))]
    name: Option<String>,
    #[validate(length(min = 1))]
    slug: Option<String>,
    description: Option<String>,
    product_ids: Option<Vec<i32>>,
}
