use std::sync::Arc;

use axum::{
    extract::{Extension, OriginalUri, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use stockwise_core::ProductId;
use stockwise_products::ProductRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/filtros", get(filter_products))
        .route("/categoria/:nombre", get(products_by_category))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    match services.products.list().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(&uri, e),
    };
    match services.products.get(id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<ProductRequest>,
) -> Response {
    match services.products.create(body).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    Json(body): Json<ProductRequest>,
) -> Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(&uri, e),
    };
    match services.products.update(id, body).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(&uri, e),
    };
    match services.products.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn products_by_category(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(nombre): Path<String>,
) -> Response {
    match services.products.by_category(&nombre).await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn filter_products(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<dto::PriceFilterQuery>,
) -> Response {
    let (min, max) = match query.bounds() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(&uri, e),
    };
    match services.products.filter_by_price(min, max).await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}
