use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{AppState, handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::healthcheck))
        .route(
            "/api/bulk/products",
            get(handlers::list_products).post(handlers::save_product),
        )
        .route("/api/bulk/products/create", post(handlers::bulk_create))
        .route("/api/bulk/products/update", put(handlers::bulk_update))
        .route("/api/bulk/products/delete", delete(handlers::bulk_delete))
        .route("/api/bulk/products/upsert", post(handlers::bulk_upsert))
        .route("/api/bulk/products/operation", post(handlers::bulk_operation))
        .route("/api/bulk/products/search", get(handlers::search_products))
        .route("/api/bulk/products/active", get(handlers::active_products))
        .route("/api/bulk/products/all", delete(handlers::delete_all_products))
        .route(
            "/api/bulk/products/category/:category",
            get(handlers::products_by_category),
        )
        .route("/api/bulk/products/:id", get(handlers::get_product))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
