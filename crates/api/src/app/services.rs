use std::sync::Arc;

use stockwise_infra::{CategoryService, DataGateway, InventoryService, ProductService};

/// Orchestrators shared by every handler.
///
/// All three sit on the same gateway; nothing else is held between requests.
#[derive(Clone)]
pub struct AppServices {
    pub products: ProductService,
    pub categories: CategoryService,
    pub inventory: InventoryService,
}

impl AppServices {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            products: ProductService::new(gateway.clone()),
            categories: CategoryService::new(gateway.clone()),
            inventory: InventoryService::new(gateway),
        }
    }
}
