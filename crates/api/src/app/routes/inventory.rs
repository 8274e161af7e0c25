use std::sync::Arc;

use axum::{
    extract::{Extension, OriginalUri, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

use stockwise_core::ProductId;
use stockwise_inventory::InventoryRecord;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/stock-bajo", get(low_stock_report))
        .route("/movimientos", post(register_movement))
        .route("/producto/:producto_id", get(inventory_by_product))
        .route("/:producto_id", put(update_quantity))
}

pub async fn low_stock_report(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    match services.inventory.low_stock().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn inventory_by_product(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(producto_id): Path<String>,
) -> Response {
    let product_id: ProductId = match producto_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(&uri, e),
    };
    match services.inventory.get(product_id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn update_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(producto_id): Path<String>,
    Json(body): Json<dto::QuantityUpdateRequest>,
) -> Response {
    let product_id: ProductId = match producto_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(&uri, e),
    };
    match services
        .inventory
        .update_quantity(product_id, body.quantity())
        .await
    {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}

pub async fn register_movement(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<InventoryRecord>,
) -> Response {
    if let Err(e) = dto::check_movement(&body) {
        return errors::domain_error_to_response(&uri, e);
    }
    match services.inventory.register_movement(body).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => errors::service_error_to_response(&uri, e),
    }
}
