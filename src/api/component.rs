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

use crate::entities::component::{self, Entity as ComponentEntity};
use crate::middleware::logging::ApiError;

//ROUTERS
pub fn component_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/component", get(list_components).post(create_component))
        .route(
            "/component/:id",
            get(get_component)
                .put(update_component)
                .delete(delete_component),
        )
        .layer(Extension(db))
}

//ROUTES
async fn list_components(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    match ComponentEntity::find().all(db.as_ref()).await {
        Ok(components) => (StatusCode::OK, Json(components)).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn get_component(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    match ComponentEntity::find_by_id(id).one(db.as_ref()).await {
        Ok(Some(component)) => (StatusCode::OK, Json(component)).into_response(),
        Ok(None) => ApiError::NotFound("Component".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn create_component(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateComponent>,
) -> Response {
    if let Err(err) = payload.validate() {
        return ApiError::Validation(err.to_string()).into_response();
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    let new_component = component::ActiveModel {
        name: Set(payload.name),
        kind: Set(payload.kind),
        price: Set(payload.price),
        image: Set(payload.image),
        ..Default::default()
    };

    match new_component.insert(&txn).await {
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

async fn update_component(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<UpdateComponent>,
) -> Response {
    if let Err(err) = payload.validate() {
        return ApiError::Validation(err.to_string()).into_response();
    }

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match ComponentEntity::find_by_id(id).one(&txn).await {
        Ok(Some(component)) => {
            let mut component: component::ActiveModel = component.into();

            if let Some(name) = payload.name {
                component.name = Set(name);
            }
            if let Some(kind) = payload.kind {
                component.kind = Set(kind);
            }
            if let Some(price) = payload.price {
                component.price = Set(price);
            }
            if let Some(image) = payload.image {
                component.image = Set(image);
            }

            match component.update(&txn).await {
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
        Ok(None) => ApiError::NotFound("Component".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

async fn delete_component(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match ComponentEntity::find_by_id(id).one(&txn).await {
        Ok(Some(component)) => {
            let component: component::ActiveModel = component.into();
            match component.delete(&txn).await {
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
        Ok(None) => ApiError::NotFound("Component".to_string()).into_response(),
        Err(err) => ApiError::Db(err.to_string()).into_response(),
    }
}

//Structs
#[derive(Deserialize, Validate, Clone, Debug)]
struct CreateComponent {
    #[validate(length(min = 1))]
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[validate(range(min = 0.0))]
    price: f32,
    image: String,
}

#[derive(Deserialize, Validate)]
struct UpdateComponent {
    #[validate(length(min = 1))]
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[validate(range(min = 0.0))]
    price: Option<f32>,
    image: Option<String>,
}
