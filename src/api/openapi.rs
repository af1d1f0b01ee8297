//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{book_instances, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library Catalog",
        version = "0.1.0",
        description = "Book copy pages of the local library catalog"
    ),
    paths(
        health::health_check,
        book_instances::bookinstance_list,
        book_instances::bookinstance_detail,
        book_instances::bookinstance_create_get,
        book_instances::bookinstance_create_post,
        book_instances::bookinstance_delete_get,
        book_instances::bookinstance_delete_post,
        book_instances::bookinstance_update_get,
        book_instances::bookinstance_update_post,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstanceDetail,
            crate::models::book_instance::BookInstanceStatus,
            crate::models::book_instance::BookInstanceForm,
            crate::models::book_instance::DeleteBookInstanceForm,
            crate::models::book_instance::BookInstanceValues,
            crate::models::book_instance::FieldError,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "bookinstances", description = "Book copy management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
