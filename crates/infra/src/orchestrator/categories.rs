use std::sync::Arc;

use stockwise_core::{CategoryId, Entity};
use stockwise_products::{
    normalize_category_name, validate_category, Category, CategoryStatistics, Product,
};

use super::{run, ServiceError, ServiceResult, Translation};
use crate::gateway::DataGateway;

const NAME_TAKEN: &str = "a category with that name already exists";
const STILL_IN_USE: &str = "category still has products";

/// Category management and category-level reporting.
#[derive(Clone)]
pub struct CategoryService {
    gateway: Arc<dyn DataGateway>,
}

impl CategoryService {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Category>> {
        run("categories.list", "-", async {
            self.gateway
                .list_categories()
                .await
                .map_err(|f| Translation::new().apply(f))
        })
        .await
    }

    pub async fn get(&self, id: CategoryId) -> ServiceResult<Category> {
        run("categories.get", format!("id={id}"), async {
            self.gateway.get_category(id).await.map_err(|f| {
                Translation::new()
                    .not_found(ServiceError::category_not_found(id))
                    .apply(f)
            })
        })
        .await
    }

    pub async fn create(&self, category: Category) -> ServiceResult<Category> {
        let params = format!("name={:?}", category.name);
        run("categories.create", params, async {
            validate_category(&category)?;

            let created = self
                .gateway
                .create_category(&category)
                .await
                .map_err(|f| Translation::new().conflict(NAME_TAKEN).apply(f))?;

            tracing::info!(category_id = ?created.id(), "category created");
            Ok(created)
        })
        .await
    }

    pub async fn update(&self, id: CategoryId, category: Category) -> ServiceResult<Category> {
        run("categories.update", format!("id={id}"), async {
            validate_category(&category)?;

            self.gateway
                .update_category(id, &category)
                .await
                .map_err(|f| {
                    Translation::new()
                        .not_found(ServiceError::category_not_found(id))
                        .conflict(NAME_TAKEN)
                        .apply(f)
                })
        })
        .await
    }

    /// The persistence tier refuses to delete a category that still has products; there
    /// is no local pre-check.
    pub async fn delete(&self, id: CategoryId) -> ServiceResult<()> {
        run("categories.delete", format!("id={id}"), async {
            self.gateway.delete_category(id).await.map_err(|f| {
                Translation::new()
                    .not_found(ServiceError::category_not_found(id))
                    .conflict(STILL_IN_USE)
                    .apply(f)
            })?;
            tracing::info!(category_id = %id, "category deleted");
            Ok(())
        })
        .await
    }

    pub async fn products(&self, category_name: &str) -> ServiceResult<Vec<Product>> {
        run("categories.products", format!("category={category_name:?}"), async {
            let name = normalize_category_name(category_name)?;
            self.fetch_products(&name).await
        })
        .await
    }

    /// Metrics computed from a fresh fetch of the category's products.
    pub async fn statistics(&self, category_name: &str) -> ServiceResult<CategoryStatistics> {
        run("categories.statistics", format!("category={category_name:?}"), async {
            let name = normalize_category_name(category_name)?;
            let products = self.fetch_products(&name).await?;
            CategoryStatistics::compute(name, &products).map_err(|e| ServiceError::Internal {
                operation: "categories.statistics",
                detail: e.to_string(),
            })
        })
        .await
    }

    async fn fetch_products(&self, name: &str) -> ServiceResult<Vec<Product>> {
        self.gateway.products_by_category(name).await.map_err(|f| {
            Translation::new()
                .not_found(ServiceError::category_name_not_found(name))
                .apply(f)
        })
    }
}
