use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use stockwise_core::{DomainError, DomainResult, Entity, InventoryId, ProductId};
use stockwise_products::Product;

/// Inventory record as exchanged with the persistence tier.
///
/// The same shape doubles as the movement payload: a movement is a record that
/// references an existing product and carries the quantity to register.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(default)]
    pub id: Option<InventoryId>,
    #[serde(rename = "producto", default)]
    pub product: Option<Product>,
    #[serde(rename = "cantidad", default)]
    pub quantity: Option<i32>,
    #[serde(rename = "stockMinimo", default)]
    pub minimum_stock: Option<i32>,
    #[serde(rename = "fechaActualizacion", default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl InventoryRecord {
    /// Id of the referenced product, if the reference carries one.
    pub fn product_id(&self) -> Option<ProductId> {
        self.product.as_ref().and_then(|p| p.id)
    }

    /// Quantity strictly below the configured minimum. Records without a minimum are
    /// never low.
    pub fn is_below_minimum(&self) -> bool {
        match (self.quantity, self.minimum_stock) {
            (Some(quantity), Some(minimum)) => quantity < minimum,
            _ => false,
        }
    }
}

impl Entity for InventoryRecord {
    type Id = InventoryId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }
}

/// Build the minimal payload for an absolute quantity set.
///
/// Only the product reference and the new quantity are sent; the current record is not
/// read first, so increases and decreases are indistinguishable.
pub fn quantity_update(
    product_id: Option<ProductId>,
    quantity: Option<i32>,
) -> DomainResult<InventoryRecord> {
    let product_id = product_id.ok_or_else(|| DomainError::validation("product id is required"))?;
    let quantity = match quantity {
        Some(q) if q >= 0 => q,
        _ => return Err(DomainError::validation("new quantity must be >= 0")),
    };

    Ok(InventoryRecord {
        product: Some(Product::reference(product_id)),
        quantity: Some(quantity),
        ..InventoryRecord::default()
    })
}

/// A movement must reference a product by id. Returns that id.
pub fn validate_movement(movement: &InventoryRecord) -> DomainResult<ProductId> {
    movement.product_id().ok_or_else(|| {
        DomainError::validation("invalid inventory movement: product id is required")
    })
}
