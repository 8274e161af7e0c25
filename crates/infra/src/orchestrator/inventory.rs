use std::sync::Arc;

use stockwise_core::ProductId;
use stockwise_inventory::{quantity_update, validate_movement, InventoryRecord};

use super::{run, EntityKind, ServiceError, ServiceResult, Translation};
use crate::gateway::DataGateway;

/// Stock reports and stock changes.
#[derive(Clone)]
pub struct InventoryService {
    gateway: Arc<dyn DataGateway>,
}

impl InventoryService {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    pub async fn low_stock(&self) -> ServiceResult<Vec<InventoryRecord>> {
        run("inventory.low_stock", "-", async {
            self.gateway
                .low_stock_inventory()
                .await
                .map_err(|f| Translation::new().apply(f))
        })
        .await
    }

    pub async fn list(&self) -> ServiceResult<Vec<InventoryRecord>> {
        run("inventory.list", "-", async {
            self.gateway
                .list_inventory()
                .await
                .map_err(|f| Translation::new().apply(f))
        })
        .await
    }

    pub async fn get(&self, product_id: ProductId) -> ServiceResult<InventoryRecord> {
        run("inventory.get", format!("product_id={product_id}"), async {
            self.gateway
                .inventory_by_product(product_id)
                .await
                .map_err(|f| {
                    Translation::new()
                        .not_found(ServiceError::inventory_not_found(product_id))
                        .apply(f)
                })
        })
        .await
    }

    /// Absolute set. The current record is not read first.
    pub async fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: Option<i32>,
    ) -> ServiceResult<InventoryRecord> {
        let params = format!("product_id={product_id} quantity={quantity:?}");
        run("inventory.update_quantity", params, async {
            let payload = quantity_update(Some(product_id), quantity)?;

            let record = self
                .gateway
                .update_inventory_quantity(product_id, &payload)
                .await
                .map_err(|f| {
                    Translation::new()
                        .not_found(ServiceError::inventory_not_found(product_id))
                        .apply(f)
                })?;

            tracing::info!(product_id = %product_id, quantity = ?record.quantity, "stock quantity set");
            Ok(record)
        })
        .await
    }

    /// Forward a movement unchanged once it names a product.
    pub async fn register_movement(&self, movement: InventoryRecord) -> ServiceResult<InventoryRecord> {
        let params = format!(
            "product_id={:?} quantity={:?}",
            movement.product_id(),
            movement.quantity
        );
        run("inventory.register_movement", params, async {
            let product_id = validate_movement(&movement)?;

            let record = self
                .gateway
                .register_movement(&movement)
                .await
                .map_err(|f| {
                    Translation::new()
                        .not_found(ServiceError::NotFound {
                            entity: EntityKind::Inventory,
                            message: format!("product not found for movement, id: {product_id}"),
                        })
                        .apply(f)
                })?;

            tracing::info!(product_id = %product_id, quantity = ?record.quantity, "movement registered");
            Ok(record)
        })
        .await
    }
}
