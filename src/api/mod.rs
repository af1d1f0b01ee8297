//! HTTP handlers and routing

pub mod book_instances;
pub mod health;
pub mod openapi;

use axum::{
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/bookinstances", get(book_instances::bookinstance_list))
        .route(
            "/bookinstance/create",
            get(book_instances::bookinstance_create_get).post(book_instances::bookinstance_create_post),
        )
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::bookinstance_delete_get).post(book_instances::bookinstance_delete_post),
        )
        .route(
            "/bookinstance/:id/update",
            get(book_instances::bookinstance_update_get).post(book_instances::bookinstance_update_post),
        )
        .route("/bookinstance/:id", get(book_instances::bookinstance_detail))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/catalog", catalog)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
}
