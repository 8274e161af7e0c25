use std::sync::Arc;

use axum::{
    extract::{Extension, OriginalUri, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use stockwise_core::CategoryId;
use stockwise_products::Category;

use crate::app::errors;
use crate::app::services::AppServices;

// `:key` is an id on the bare resource and a category name on the sub-resources; the
// router requires one parameter name per position.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:key",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/:key/productos", get(category_products))
        .route("/:key/estadisticas", get(category_statistics))
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    match services.categories.list().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(&uri, e),
    };
    match services.categories.get(id).await {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Category>,
) -> Response {
    match services.categories.create(body).await {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    Json(body): Json<Category>,
) -> Response {
    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(&uri, e),
    };
    match services.categories.update(id, body).await {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    let id: CategoryId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(&uri, e),
    };
    match services.categories.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn category_products(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(nombre): Path<String>,
) -> Response {
    match services.categories.products(&nombre).await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn category_statistics(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(nombre): Path<String>,
) -> Response {
    match services.categories.statistics(&nombre).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}
