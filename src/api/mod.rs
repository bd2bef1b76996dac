pub mod bundle;
pub mod collection;
pub mod component;
pub mod custom_accessory;
pub mod product;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::middleware::logging::logging_middleware;

use {
    bundle::bundle_router, collection::collection_router, component::component_router,
    custom_accessory::custom_accessory_router, product::product_router,
};

pub fn create_api_router(shared_db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .nest("/api", product_router(shared_db.clone()))
        .nest("/api", bundle_router(shared_db.clone()))
        .nest("/api", collection_router(shared_db.clone()))
        .nest("/api", component_router(shared_db.clone()))
        .nest("/api", custom_accessory_router(shared_db.clone()))
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
