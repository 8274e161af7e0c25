use rust_decimal::Decimal;
use std::sync::Arc;

use stockwise_core::{Entity, ProductId};
use stockwise_products::{
    normalize_category_name, validate_product, PriceRange, Product, ProductRequest,
};

use super::{run, EntityKind, ServiceError, ServiceResult, Translation};
use crate::gateway::DataGateway;

/// Product catalog operations.
#[derive(Clone)]
pub struct ProductService {
    gateway: Arc<dyn DataGateway>,
}

impl ProductService {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Product>> {
        run("products.list", "-", async {
            self.gateway
                .list_products()
                .await
                .map_err(|f| Translation::new().apply(f))
        })
        .await
    }

    pub async fn get(&self, id: ProductId) -> ServiceResult<Product> {
        run("products.get", format!("id={id}"), async {
            self.gateway
                .get_product(id)
                .await
                .map_err(|f| {
                    Translation::new()
                        .not_found(ServiceError::product_not_found(id))
                        .apply(f)
                })
        })
        .await
    }

    pub async fn create(&self, request: ProductRequest) -> ServiceResult<Product> {
        let params = format!("name={:?}", request.name);
        run("products.create", params, async {
            validate_product(&request)?;

            // The only thing a create can fail to find is the referenced category.
            let category = request.category_name.as_deref().unwrap_or_default().to_string();
            let product = self
                .gateway
                .create_product(&request)
                .await
                .map_err(|f| {
                    Translation::new()
                        .not_found(ServiceError::category_name_not_found(&category))
                        .apply(f)
                })?;

            tracing::info!(product_id = ?product.id(), "product created");
            Ok(product)
        })
        .await
    }

    pub async fn update(&self, id: ProductId, request: ProductRequest) -> ServiceResult<Product> {
        run("products.update", format!("id={id}"), async {
            validate_product(&request)?;

            self.gateway
                .update_product(id, &request)
                .await
                .map_err(|f| {
                    Translation::new()
                        .not_found(ServiceError::product_not_found(id))
                        .apply(f)
                })
        })
        .await
    }

    pub async fn delete(&self, id: ProductId) -> ServiceResult<()> {
        run("products.delete", format!("id={id}"), async {
            self.gateway.delete_product(id).await.map_err(|f| {
                Translation::new()
                    .not_found(ServiceError::product_not_found(id))
                    .apply(f)
            })?;
            tracing::info!(product_id = %id, "product deleted");
            Ok(())
        })
        .await
    }

    /// Products of one category. An unknown category reads as "no products".
    pub async fn by_category(&self, category_name: &str) -> ServiceResult<Vec<Product>> {
        run("products.by_category", format!("category={category_name:?}"), async {
            let name = normalize_category_name(category_name)?;
            self.gateway
                .products_by_category(&name)
                .await
                .map_err(|f| {
                    Translation::new()
                        .not_found(ServiceError::NotFound {
                            entity: EntityKind::Product,
                            message: format!("no products found for category: {name}"),
                        })
                        .apply(f)
                })
        })
        .await
    }

    /// Whole-catalog fetch, filtered in process. Bounds are inclusive and products
    /// without a price never match.
    pub async fn filter_by_price(
        &self,
        min: Option<Decimal>,
        max: Option<Decimal>,
    ) -> ServiceResult<Vec<Product>> {
        let params = format!("min={min:?} max={max:?}");
        run("products.filter_by_price", params, async {
            let range = PriceRange::new(min, max)?;
            let all = self
                .gateway
                .list_products()
                .await
                .map_err(|f| Translation::new().apply(f))?;
            Ok(range.apply(all))
        })
        .await
    }
}
