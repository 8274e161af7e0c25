use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use stockwise_core::{CategoryId, ProductId};
use stockwise_inventory::InventoryRecord;
use stockwise_products::{Category, Product, ProductRequest};

/// Three-way classification of a failed remote call.
///
/// This is the only thing the orchestrators look at when translating a failure; the
/// transport details travel along in [`RemoteFailure`] for logging.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemoteFailureKind {
    /// The addressed resource does not exist (HTTP 404).
    NotFound,
    /// The persistence tier refused the write because of existing state (HTTP 409).
    Conflict,
    /// Anything else: other statuses, transport errors, undecodable bodies.
    Unavailable,
}

impl core::fmt::Display for RemoteFailureKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            RemoteFailureKind::NotFound => "not found",
            RemoteFailureKind::Conflict => "conflict",
            RemoteFailureKind::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

/// Classified failure raised by a [`DataGateway`] call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation}: {kind}: {detail}")]
pub struct RemoteFailure {
    pub kind: RemoteFailureKind,
    /// Gateway operation name, e.g. `"products.get"`.
    pub operation: &'static str,
    /// HTTP status, when the remote tier answered at all.
    pub status: Option<u16>,
    pub detail: String,
}

impl RemoteFailure {
    pub fn not_found(operation: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind: RemoteFailureKind::NotFound,
            operation,
            status: Some(404),
            detail: detail.into(),
        }
    }

    pub fn conflict(operation: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind: RemoteFailureKind::Conflict,
            operation,
            status: Some(409),
            detail: detail.into(),
        }
    }

    /// Transport-level failure (no status available).
    pub fn unavailable(operation: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind: RemoteFailureKind::Unavailable,
            operation,
            status: None,
            detail: detail.into(),
        }
    }

    /// Classify a non-2xx HTTP status.
    pub fn from_status(operation: &'static str, status: u16, body: impl Into<String>) -> Self {
        let kind = match status {
            404 => RemoteFailureKind::NotFound,
            409 => RemoteFailureKind::Conflict,
            _ => RemoteFailureKind::Unavailable,
        };
        Self {
            kind,
            operation,
            status: Some(status),
            detail: body.into(),
        }
    }
}

pub type GatewayResult<T> = Result<T, RemoteFailure>;

/// Typed client of the persistence tier.
///
/// Implementations marshal requests and classify failures; they perform no business
/// logic, no retries and no caching. Each method is exactly one remote call.
#[async_trait]
pub trait DataGateway: Send + Sync {
    async fn list_products(&self) -> GatewayResult<Vec<Product>>;

    async fn get_product(&self, id: ProductId) -> GatewayResult<Product>;

    async fn create_product(&self, request: &ProductRequest) -> GatewayResult<Product>;

    async fn update_product(&self, id: ProductId, request: &ProductRequest) -> GatewayResult<Product>;

    async fn delete_product(&self, id: ProductId) -> GatewayResult<()>;

    /// Products whose category has exactly this name.
    async fn products_by_category(&self, category_name: &str) -> GatewayResult<Vec<Product>>;

    async fn list_categories(&self) -> GatewayResult<Vec<Category>>;

    async fn get_category(&self, id: CategoryId) -> GatewayResult<Category>;

    async fn create_category(&self, category: &Category) -> GatewayResult<Category>;

    async fn update_category(&self, id: CategoryId, category: &Category) -> GatewayResult<Category>;

    async fn delete_category(&self, id: CategoryId) -> GatewayResult<()>;

    /// Inventory records whose quantity is below their minimum.
    async fn low_stock_inventory(&self) -> GatewayResult<Vec<InventoryRecord>>;

    async fn list_inventory(&self) -> GatewayResult<Vec<InventoryRecord>>;

    async fn inventory_by_product(&self, product_id: ProductId) -> GatewayResult<InventoryRecord>;

    /// Absolute quantity set for the product's record.
    async fn update_inventory_quantity(
        &self,
        product_id: ProductId,
        payload: &InventoryRecord,
    ) -> GatewayResult<InventoryRecord>;

    async fn register_movement(&self, movement: &InventoryRecord) -> GatewayResult<InventoryRecord>;
}

#[async_trait]
impl<G> DataGateway for Arc<G>
where
    G: DataGateway + ?Sized,
{
    async fn list_products(&self) -> GatewayResult<Vec<Product>> {
        (**self).list_products().await
    }

    async fn get_product(&self, id: ProductId) -> GatewayResult<Product> {
        (**self).get_product(id).await
    }

    async fn create_product(&self, request: &ProductRequest) -> GatewayResult<Product> {
        (**self).create_product(request).await
    }

    async fn update_product(&self, id: ProductId, request: &ProductRequest) -> GatewayResult<Product> {
        (**self).update_product(id, request).await
    }

    async fn delete_product(&self, id: ProductId) -> GatewayResult<()> {
        (**self).delete_product(id).await
    }

    async fn products_by_category(&self, category_name: &str) -> GatewayResult<Vec<Product>> {
        (**self).products_by_category(category_name).await
    }

    async fn list_categories(&self) -> GatewayResult<Vec<Category>> {
        (**self).list_categories().await
    }

    async fn get_category(&self, id: CategoryId) -> GatewayResult<Category> {
        (**self).get_category(id).await
    }

    async fn create_category(&self, category: &Category) -> GatewayResult<Category> {
        (**self).create_category(category).await
    }

    async fn update_category(&self, id: CategoryId, category: &Category) -> GatewayResult<Category> {
        (**self).update_category(id, category).await
    }

    async fn delete_category(&self, id: CategoryId) -> GatewayResult<()> {
        (**self).delete_category(id).await
    }

    async fn low_stock_inventory(&self) -> GatewayResult<Vec<InventoryRecord>> {
        (**self).low_stock_inventory().await
    }

    async fn list_inventory(&self) -> GatewayResult<Vec<InventoryRecord>> {
        (**self).list_inventory().await
    }

    async fn inventory_by_product(&self, product_id: ProductId) -> GatewayResult<InventoryRecord> {
        (**self).inventory_by_product(product_id).await
    }

    async fn update_inventory_quantity(
        &self,
        product_id: ProductId,
        payload: &InventoryRecord,
    ) -> GatewayResult<InventoryRecord> {
        (**self).update_inventory_quantity(product_id, payload).await
    }

    async fn register_movement(&self, movement: &InventoryRecord) -> GatewayResult<InventoryRecord> {
        (**self).register_movement(movement).await
    }
}
