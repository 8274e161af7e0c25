use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use stockwise_core::{CategoryId, InventoryId, ProductId};
use stockwise_inventory::InventoryRecord;
use stockwise_products::{Category, Product, ProductRequest, DEFAULT_LOW_STOCK_THRESHOLD};

use super::r#trait::{DataGateway, GatewayResult, RemoteFailure};

#[derive(Debug, Clone)]
struct StoredProduct {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    category_name: Option<String>,
}

#[derive(Debug, Clone)]
struct StoredInventory {
    id: InventoryId,
    quantity: i32,
    minimum: Option<i32>,
    updated_at: NaiveDateTime,
}

impl StoredInventory {
    fn is_low(&self) -> bool {
        self.minimum.is_some_and(|minimum| self.quantity < minimum)
    }
}

#[derive(Debug, Default)]
struct State {
    products: BTreeMap<ProductId, StoredProduct>,
    categories: BTreeMap<CategoryId, Category>,
    // Keyed by product: there is exactly one record per product.
    inventory: BTreeMap<ProductId, StoredInventory>,
    next_product: i64,
    next_category: i64,
    next_inventory: i64,
}

impl State {
    fn category_exists(&self, name: &str) -> bool {
        self.categories
            .values()
            .any(|c| c.name.as_deref() == Some(name))
    }

    fn name_taken(&self, name: Option<&str>, except: Option<CategoryId>) -> bool {
        let Some(name) = name else {
            return false;
        };
        self.categories
            .iter()
            .any(|(id, c)| Some(*id) != except && c.name.as_deref() == Some(name))
    }

    fn product_view(&self, id: ProductId) -> Option<Product> {
        let stored = self.products.get(&id)?;
        let inventory = self.inventory.get(&id);
        Some(Product {
            id: Some(id),
            name: stored.name.clone(),
            description: stored.description.clone(),
            price: stored.price,
            category_name: stored.category_name.clone(),
            stock: inventory.map(|i| i.quantity),
            low_stock: inventory.map(StoredInventory::is_low),
        })
    }

    fn record_view(&self, product_id: ProductId) -> Option<InventoryRecord> {
        let stored = self.inventory.get(&product_id)?;
        Some(InventoryRecord {
            id: Some(stored.id),
            product: self.product_view(product_id),
            quantity: Some(stored.quantity),
            minimum_stock: stored.minimum,
            updated_at: Some(stored.updated_at),
        })
    }
}

/// In-process stand-in for the persistence tier.
///
/// Intended for tests/dev. Mirrors the remote tier's observable behavior: id
/// assignment, unique category names, one inventory record per product and the
/// not-found/conflict answers the orchestrators translate.
#[derive(Debug)]
pub struct InMemoryDataGateway {
    state: RwLock<State>,
    default_minimum: i32,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl Default for InMemoryDataGateway {
    fn default() -> Self {
        Self::with_default_minimum(DEFAULT_LOW_STOCK_THRESHOLD)
    }
}

impl InMemoryDataGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum stock given to inventory records created alongside new products.
    pub fn with_default_minimum(minimum: i32) -> Self {
        Self {
            state: RwLock::new(State::default()),
            default_minimum: minimum,
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// While enabled, every call fails as if the remote tier were down.
    pub fn set_unavailable(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of gateway calls received so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, operation: &'static str) -> GatewayResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(operation, "in-memory gateway call");
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteFailure::unavailable(operation, "data service unavailable"));
        }
        Ok(())
    }

    fn read(&self, operation: &'static str) -> GatewayResult<RwLockReadGuard<'_, State>> {
        self.enter(operation)?;
        self.state
            .read()
            .map_err(|_| RemoteFailure::unavailable(operation, "lock poisoned"))
    }

    fn write(&self, operation: &'static str) -> GatewayResult<RwLockWriteGuard<'_, State>> {
        self.enter(operation)?;
        self.state
            .write()
            .map_err(|_| RemoteFailure::unavailable(operation, "lock poisoned"))
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl DataGateway for InMemoryDataGateway {
    async fn list_products(&self) -> GatewayResult<Vec<Product>> {
        let state = self.read("products.list")?;
        Ok(state
            .products
            .keys()
            .filter_map(|id| state.product_view(*id))
            .collect())
    }

    async fn get_product(&self, id: ProductId) -> GatewayResult<Product> {
        const OP: &str = "products.get";
        let state = self.read(OP)?;
        state
            .product_view(id)
            .ok_or_else(|| RemoteFailure::not_found(OP, format!("product {id}")))
    }

    async fn create_product(&self, request: &ProductRequest) -> GatewayResult<Product> {
        const OP: &str = "products.create";
        let mut state = self.write(OP)?;

        let category = request.category_name.clone().unwrap_or_default();
        if !state.category_exists(&category) {
            return Err(RemoteFailure::not_found(OP, format!("category {category}")));
        }

        state.next_product += 1;
        let id = ProductId::new(state.next_product);
        state.products.insert(
            id,
            StoredProduct {
                name: request.name.clone(),
                description: request.description.clone(),
                price: request.price,
                category_name: Some(category),
            },
        );

        state.next_inventory += 1;
        let record = StoredInventory {
            id: InventoryId::new(state.next_inventory),
            quantity: request.stock.unwrap_or(0),
            minimum: Some(self.default_minimum),
            updated_at: now(),
        };
        state.inventory.insert(id, record);

        state
            .product_view(id)
            .ok_or_else(|| RemoteFailure::unavailable(OP, "created product vanished"))
    }

    async fn update_product(&self, id: ProductId, request: &ProductRequest) -> GatewayResult<Product> {
        const OP: &str = "products.update";
        let mut state = self.write(OP)?;

        if !state.products.contains_key(&id) {
            return Err(RemoteFailure::not_found(OP, format!("product {id}")));
        }
        if let Some(category) = request.category_name.as_deref() {
            if !state.category_exists(category) {
                return Err(RemoteFailure::not_found(OP, format!("category {category}")));
            }
        }

        if let Some(stored) = state.products.get_mut(&id) {
            if request.name.is_some() {
                stored.name = request.name.clone();
            }
            if request.description.is_some() {
                stored.description = request.description.clone();
            }
            if request.price.is_some() {
                stored.price = request.price;
            }
            if request.category_name.is_some() {
                stored.category_name = request.category_name.clone();
            }
        }
        if let (Some(stock), Some(record)) = (request.stock, state.inventory.get_mut(&id)) {
            record.quantity = stock;
            record.updated_at = now();
        }

        state
            .product_view(id)
            .ok_or_else(|| RemoteFailure::unavailable(OP, "updated product vanished"))
    }

    async fn delete_product(&self, id: ProductId) -> GatewayResult<()> {
        const OP: &str = "products.delete";
        let mut state = self.write(OP)?;
        if state.products.remove(&id).is_none() {
            return Err(RemoteFailure::not_found(OP, format!("product {id}")));
        }
        state.inventory.remove(&id);
        Ok(())
    }

    async fn products_by_category(&self, category_name: &str) -> GatewayResult<Vec<Product>> {
        const OP: &str = "products.by_category";
        let state = self.read(OP)?;
        if !state.category_exists(category_name) {
            return Err(RemoteFailure::not_found(OP, format!("category {category_name}")));
        }
        Ok(state
            .products
            .iter()
            .filter(|(_, p)| p.category_name.as_deref() == Some(category_name))
            .filter_map(|(id, _)| state.product_view(*id))
            .collect())
    }

    async fn list_categories(&self) -> GatewayResult<Vec<Category>> {
        let state = self.read("categories.list")?;
        Ok(state.categories.values().cloned().collect())
    }

    async fn get_category(&self, id: CategoryId) -> GatewayResult<Category> {
        const OP: &str = "categories.get";
        let state = self.read(OP)?;
        state
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| RemoteFailure::not_found(OP, format!("category {id}")))
    }

    async fn create_category(&self, category: &Category) -> GatewayResult<Category> {
        const OP: &str = "categories.create";
        let mut state = self.write(OP)?;
        if state.name_taken(category.name.as_deref(), None) {
            return Err(RemoteFailure::conflict(OP, "duplicate category name"));
        }

        state.next_category += 1;
        let id = CategoryId::new(state.next_category);
        let stored = Category {
            id: Some(id),
            name: category.name.clone(),
            description: category.description.clone(),
        };
        state.categories.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_category(&self, id: CategoryId, category: &Category) -> GatewayResult<Category> {
        const OP: &str = "categories.update";
        let mut state = self.write(OP)?;

        let Some(previous) = state.categories.get(&id).and_then(|c| c.name.clone()) else {
            if state.categories.contains_key(&id) {
                return Err(RemoteFailure::unavailable(OP, "stored category has no name"));
            }
            return Err(RemoteFailure::not_found(OP, format!("category {id}")));
        };
        if state.name_taken(category.name.as_deref(), Some(id)) {
            return Err(RemoteFailure::conflict(OP, "duplicate category name"));
        }

        let updated = Category {
            id: Some(id),
            name: category.name.clone(),
            description: category.description.clone(),
        };
        state.categories.insert(id, updated.clone());

        // Products reference their category by name, so a rename follows through.
        if updated.name.as_deref() != Some(previous.as_str()) {
            for product in state.products.values_mut() {
                if product.category_name.as_deref() == Some(previous.as_str()) {
                    product.category_name = updated.name.clone();
                }
            }
        }

        Ok(updated)
    }

    async fn delete_category(&self, id: CategoryId) -> GatewayResult<()> {
        const OP: &str = "categories.delete";
        let mut state = self.write(OP)?;

        let Some(category) = state.categories.get(&id) else {
            return Err(RemoteFailure::not_found(OP, format!("category {id}")));
        };
        let name = category.name.clone();
        let in_use = state
            .products
            .values()
            .any(|p| name.is_some() && p.category_name == name);
        if in_use {
            return Err(RemoteFailure::conflict(OP, "category has products"));
        }

        state.categories.remove(&id);
        Ok(())
    }

    async fn low_stock_inventory(&self) -> GatewayResult<Vec<InventoryRecord>> {
        let state = self.read("inventory.low_stock")?;
        Ok(state
            .inventory
            .iter()
            .filter(|(_, record)| record.is_low())
            .filter_map(|(product_id, _)| state.record_view(*product_id))
            .collect())
    }

    async fn list_inventory(&self) -> GatewayResult<Vec<InventoryRecord>> {
        let state = self.read("inventory.list")?;
        Ok(state
            .inventory
            .keys()
            .filter_map(|product_id| state.record_view(*product_id))
            .collect())
    }

    async fn inventory_by_product(&self, product_id: ProductId) -> GatewayResult<InventoryRecord> {
        const OP: &str = "inventory.by_product";
        let state = self.read(OP)?;
        state
            .record_view(product_id)
            .ok_or_else(|| RemoteFailure::not_found(OP, format!("inventory for product {product_id}")))
    }

    async fn update_inventory_quantity(
        &self,
        product_id: ProductId,
        payload: &InventoryRecord,
    ) -> GatewayResult<InventoryRecord> {
        const OP: &str = "inventory.update_quantity";
        let mut state = self.write(OP)?;

        let Some(record) = state.inventory.get_mut(&product_id) else {
            return Err(RemoteFailure::not_found(OP, format!("inventory for product {product_id}")));
        };
        if let Some(quantity) = payload.quantity {
            record.quantity = quantity;
        }
        record.updated_at = now();

        state
            .record_view(product_id)
            .ok_or_else(|| RemoteFailure::unavailable(OP, "updated record vanished"))
    }

    async fn register_movement(&self, movement: &InventoryRecord) -> GatewayResult<InventoryRecord> {
        const OP: &str = "inventory.register_movement";
        let mut state = self.write(OP)?;

        let Some(product_id) = movement.product_id() else {
            return Err(RemoteFailure::from_status(OP, 400, "movement without product"));
        };
        let Some(record) = state.inventory.get_mut(&product_id) else {
            return Err(RemoteFailure::not_found(OP, format!("inventory for product {product_id}")));
        };

        // A movement registers an inbound entry; the data tier refuses negative values.
        let entry = match movement.quantity {
            Some(q) if q >= 0 => q,
            _ => return Err(RemoteFailure::from_status(OP, 400, "invalid movement quantity")),
        };
        if matches!(movement.minimum_stock, Some(minimum) if minimum < 0) {
            return Err(RemoteFailure::from_status(OP, 400, "invalid movement minimum"));
        }
        let Some(quantity) = record.quantity.checked_add(entry) else {
            return Err(RemoteFailure::conflict(OP, "stock out of range"));
        };
        record.quantity = quantity;
        if movement.minimum_stock.is_some() {
            record.minimum = movement.minimum_stock;
        }
        record.updated_at = now();

        state
            .record_view(product_id)
            .ok_or_else(|| RemoteFailure::unavailable(OP, "moved record vanished"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::RemoteFailureKind;

    async fn seeded() -> (InMemoryDataGateway, Product) {
        let gateway = InMemoryDataGateway::new();
        gateway
            .create_category(&Category::new("Tech", None))
            .await
            .unwrap();
        let product = gateway
            .create_product(&ProductRequest {
                name: Some("Laptop".to_string()),
                price: Some(Decimal::from(100)),
                category_name: Some("Tech".to_string()),
                stock: Some(12),
                ..ProductRequest::default()
            })
            .await
            .unwrap();
        (gateway, product)
    }

    #[tokio::test]
    async fn create_product_creates_inventory_record() {
        let (gateway, product) = seeded().await;
        let id = product.id.unwrap();
        assert_eq!(product.stock, Some(12));
        assert_eq!(product.low_stock, Some(false));

        let record = gateway.inventory_by_product(id).await.unwrap();
        assert_eq!(record.quantity, Some(12));
        assert_eq!(record.minimum_stock, Some(DEFAULT_LOW_STOCK_THRESHOLD));
        assert_eq!(record.product_id(), Some(id));
    }

    #[tokio::test]
    async fn unknown_category_is_not_found() {
        let gateway = InMemoryDataGateway::new();
        let err = gateway
            .create_product(&ProductRequest {
                name: Some("Ghost".to_string()),
                category_name: Some("Nowhere".to_string()),
                ..ProductRequest::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, RemoteFailureKind::NotFound);
        assert_eq!(err.operation, "products.create");
    }

    #[tokio::test]
    async fn duplicate_category_name_conflicts() {
        let (gateway, _) = seeded().await;
        let err = gateway
            .create_category(&Category::new("Tech", None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, RemoteFailureKind::Conflict);
    }

    #[tokio::test]
    async fn deleting_category_in_use_conflicts() {
        let (gateway, product) = seeded().await;
        let category_id = gateway.list_categories().await.unwrap()[0].id.unwrap();

        let err = gateway.delete_category(category_id).await.unwrap_err();
        assert_eq!(err.kind, RemoteFailureKind::Conflict);

        gateway.delete_product(product.id.unwrap()).await.unwrap();
        gateway.delete_category(category_id).await.unwrap();
        assert!(gateway.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rename_follows_through_to_products() {
        let (gateway, _) = seeded().await;
        let category_id = gateway.list_categories().await.unwrap()[0].id.unwrap();
        gateway
            .update_category(category_id, &Category::new("Hardware", None))
            .await
            .unwrap();

        assert_eq!(gateway.products_by_category("Hardware").await.unwrap().len(), 1);
        assert_eq!(
            gateway.products_by_category("Tech").await.unwrap_err().kind,
            RemoteFailureKind::NotFound
        );
    }

    #[tokio::test]
    async fn movement_adds_entry_to_stock() {
        let (gateway, product) = seeded().await;
        let id = product.id.unwrap();
        let movement = |quantity| InventoryRecord {
            product: Some(Product::reference(id)),
            quantity: Some(quantity),
            ..InventoryRecord::default()
        };

        let record = gateway.register_movement(&movement(3)).await.unwrap();
        assert_eq!(record.quantity, Some(15));
        assert!(!record.is_below_minimum());

        let err = gateway.register_movement(&movement(i32::MAX)).await.unwrap_err();
        assert_eq!(err.kind, RemoteFailureKind::Conflict);
        assert_eq!(gateway.inventory_by_product(id).await.unwrap().quantity, Some(15));
    }

    #[tokio::test]
    async fn movement_rejects_negative_or_missing_values() {
        let (gateway, product) = seeded().await;
        let id = product.id.unwrap();

        for (quantity, minimum_stock) in [(Some(-5), None), (None, None), (Some(1), Some(-1))] {
            let err = gateway
                .register_movement(&InventoryRecord {
                    product: Some(Product::reference(id)),
                    quantity,
                    minimum_stock,
                    ..InventoryRecord::default()
                })
                .await
                .unwrap_err();
            assert_eq!(err.kind, RemoteFailureKind::Unavailable);
            assert_eq!(err.status, Some(400));
        }
        assert_eq!(gateway.inventory_by_product(id).await.unwrap().quantity, Some(12));
    }

    #[tokio::test]
    async fn movement_can_replace_minimum() {
        let (gateway, product) = seeded().await;
        let record = gateway
            .register_movement(&InventoryRecord {
                product: Some(Product::reference(product.id.unwrap())),
                quantity: Some(0),
                minimum_stock: Some(20),
                ..InventoryRecord::default()
            })
            .await
            .unwrap();
        assert_eq!(record.minimum_stock, Some(20));
        assert_eq!(record.product.unwrap().low_stock, Some(true));
    }

    #[tokio::test]
    async fn failure_mode_fails_every_call_and_counts() {
        let (gateway, _) = seeded().await;
        let before = gateway.calls();
        gateway.set_unavailable(true);

        let err = gateway.list_products().await.unwrap_err();
        assert_eq!(err.kind, RemoteFailureKind::Unavailable);
        assert_eq!(err.status, None);
        assert_eq!(gateway.calls(), before + 1);

        gateway.set_unavailable(false);
        assert_eq!(gateway.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn custom_default_minimum() {
        let gateway = InMemoryDataGateway::with_default_minimum(50);
        gateway
            .create_category(&Category::new("Tech", None))
            .await
            .unwrap();
        let product = gateway
            .create_product(&ProductRequest {
                name: Some("Cable".to_string()),
                price: Some(Decimal::from(3)),
                category_name: Some("Tech".to_string()),
                stock: Some(12),
                ..ProductRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(product.low_stock, Some(true));
    }
}
