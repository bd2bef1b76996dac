use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

use crate::entities::custom_accessory::{self, Entity as CustomAccessoryEntity, Status};
use crate::middleware::logging::ApiError;

//ROUTERS
pub fn custom_accessory_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/custom", get(list_customs).post(create_custom))
        .route(
            "/custom/:id",
            get(get_custom).put(update_custom).delete(delete_custom),
        )
        .layer(Extension(db))
}

//ROUTES
async fn list_customs(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    match CustomAccessoryEntity::find().all(db.as_ref()).await {
        Ok(customs) => (StatusCode::OK, Json(customs)).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn get_custom(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    match CustomAccessoryEntity::find_by_id(id).one(db.as_ref()).await {
        Ok(Some(custom)) => (StatusCode::OK, Json(custom)).into_response(),
        Ok(None) => ApiError::NotFound("Custom accessory".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn create_custom(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateCustomAccessory>,
) -> Response {
    if let Err(err) = payload.validate() {
        return ApiError::Validation(err.to_string()).into_response();
    }
    let status = match Status::from_str(&payload.status) {
        Ok(status) => status,
        Err(err) => return ApiError::Validation(err).into_response(),
    };

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    let new_custom = custom_accessory::ActiveModel {
        user_id: Set(payload.user_id),
        name: Set(payload.name),
        kind: Set(payload.kind),
        structure: Set(payload.structure),
        status: Set(status),
        image: Set(payload.image),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
        ..Default::default()
    };

    match new_custom.insert(&txn).await {
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

async fn update_custom(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<UpdateCustomAccessory>,
) -> Response {
    if let Err(err) = payload.validate() {
        return ApiError::Validation(err.to_string()).into_response();
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match CustomAccessoryEntity::find_by_id(id).one(&txn).await {
        Ok(Some(custom)) => {
            let mut custom: custom_accessory::ActiveModel = custom.into();

            if let Some(name) = payload.name {
                custom.name = Set(name);
            }
            if let Some(kind) = payload.kind {
                custom.kind = Set(kind);
            }
            if let Some(structure) = payload.structure {
                custom.structure = Set(structure);
            }
            if let Some(status) = payload.status {
                match Status::from_str(&status) {
                    Ok(status) => custom.status = Set(status),
                    Err(err) => {
                        let _ = txn.rollback().await;
                        return ApiError::Validation(err).into_response();
                    }
                }
            }
            if let Some(image) = payload.image {
                custom.image = Set(image);
            }
            custom.updated_at = Set(Some(Utc::now()));

            match custom.update(&txn).await {
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
        Ok(None) => ApiError::NotFound("Custom accessory".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn delete_custom(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match CustomAccessoryEntity::find_by_id(id).one(&txn).await {
        Ok(Some(custom)) => {
            let custom: custom_accessory::ActiveModel = custom.into();
            match custom.delete(&txn).await {
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
        Ok(None) => ApiError::NotFound("Custom accessory".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

//Structs
#[derive(Deserialize, Validate, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct CreateCustomAccessory {
    user_id: i32,
    #[validate(length(min = 1))]
    name: String,
    #[serde(rename = "type")]
    kind: String,
    // component snapshots assembled by the user
    structure: serde_json::Value,
    status: String,
    image: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateCustomAccessory {
    #[validate(length(min = 1))]
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    structure: Option<serde_json::Value>,
    status: Option<String>,
    image: Option<String>,
}
