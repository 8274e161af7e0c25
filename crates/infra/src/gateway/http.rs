use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use stockwise_core::{CategoryId, ProductId};
use stockwise_inventory::InventoryRecord;
use stockwise_products::{Category, Product, ProductRequest};

use super::r#trait::{DataGateway, GatewayResult, RemoteFailure};
use crate::config::{ConfigError, GatewayConfig};

// Error bodies are kept for logging only.
const MAX_DETAIL_LEN: usize = 512;

/// [`DataGateway`] over the persistence tier's REST API.
#[derive(Debug, Clone)]
pub struct HttpDataGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpDataGateway {
    pub fn new(base_url: Url, config: &GatewayConfig) -> Result<Self, ConfigError> {
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(base_url.to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// Append path segments to the base url. Segments are percent-encoded, so category
    /// names with spaces or slashes stay a single segment.
    fn url(&self, operation: &'static str, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteFailure::unavailable(operation, "base url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
    ) -> GatewayResult<RequestBuilder> {
        let url = self.url(operation, segments)?;
        tracing::debug!(operation, %method, %url, "data service call");
        Ok(self.client.request(method, url))
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> GatewayResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteFailure::unavailable(operation, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = error_detail(response).await;
        Err(RemoteFailure::from_status(operation, status.as_u16(), detail))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
    ) -> GatewayResult<T> {
        let request = self.request(operation, method, segments)?;
        let response = self.send(operation, request).await?;
        decode(operation, response).await
    }

    async fn fetch_with<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> GatewayResult<T> {
        let request = self.request(operation, method, segments)?.json(body);
        let response = self.send(operation, request).await?;
        decode(operation, response).await
    }

    async fn delete(&self, operation: &'static str, segments: &[&str]) -> GatewayResult<()> {
        let request = self.request(operation, Method::DELETE, segments)?;
        self.send(operation, request).await.map(|_| ())
    }
}

async fn decode<T: DeserializeOwned>(
    operation: &'static str,
    response: reqwest::Response,
) -> GatewayResult<T> {
    let status = response.status().as_u16();
    response.json::<T>().await.map_err(|e| RemoteFailure {
        status: Some(status),
        ..RemoteFailure::unavailable(operation, format!("undecodable body: {e}"))
    })
}

const DATA: &str = "data";
const PRODUCTS: &str = "productos";
const CATEGORIES: &str = "categorias";
const INVENTORY: &str = "inventario";

#[async_trait]
impl DataGateway for HttpDataGateway {
    async fn list_products(&self) -> GatewayResult<Vec<Product>> {
        self.fetch("products.list", Method::GET, &[DATA, PRODUCTS])
            .await
    }

    async fn get_product(&self, id: ProductId) -> GatewayResult<Product> {
        let id = id.to_string();
        self.fetch("products.get", Method::GET, &[DATA, PRODUCTS, &id])
            .await
    }

    async fn create_product(&self, request: &ProductRequest) -> GatewayResult<Product> {
        self.fetch_with("products.create", Method::POST, &[DATA, PRODUCTS], request)
            .await
    }

    async fn update_product(&self, id: ProductId, request: &ProductRequest) -> GatewayResult<Product> {
        let id = id.to_string();
        self.fetch_with("products.update", Method::PUT, &[DATA, PRODUCTS, &id], request)
            .await
    }

    async fn delete_product(&self, id: ProductId) -> GatewayResult<()> {
        let id = id.to_string();
        self.delete("products.delete", &[DATA, PRODUCTS, &id]).await
    }

    async fn products_by_category(&self, category_name: &str) -> GatewayResult<Vec<Product>> {
        self.fetch(
            "products.by_category",
            Method::GET,
            &[DATA, PRODUCTS, "categoria", category_name],
        )
        .await
    }

    async fn list_categories(&self) -> GatewayResult<Vec<Category>> {
        self.fetch("categories.list", Method::GET, &[DATA, CATEGORIES])
            .await
    }

    async fn get_category(&self, id: CategoryId) -> GatewayResult<Category> {
        let id = id.to_string();
        self.fetch("categories.get", Method::GET, &[DATA, CATEGORIES, &id])
            .await
    }

    async fn create_category(&self, category: &Category) -> GatewayResult<Category> {
        self.fetch_with("categories.create", Method::POST, &[DATA, CATEGORIES], category)
            .await
    }

    async fn update_category(&self, id: CategoryId, category: &Category) -> GatewayResult<Category> {
        let id = id.to_string();
        self.fetch_with(
            "categories.update",
            Method::PUT,
            &[DATA, CATEGORIES, &id],
            category,
        )
        .await
    }

    async fn delete_category(&self, id: CategoryId) -> GatewayResult<()> {
        let id = id.to_string();
        self.delete("categories.delete", &[DATA, CATEGORIES, &id])
            .await
    }

    async fn low_stock_inventory(&self) -> GatewayResult<Vec<InventoryRecord>> {
        self.fetch(
            "inventory.low_stock",
            Method::GET,
            &[DATA, INVENTORY, "stock-bajo"],
        )
        .await
    }

    async fn list_inventory(&self) -> GatewayResult<Vec<InventoryRecord>> {
        self.fetch("inventory.list", Method::GET, &[DATA, INVENTORY])
            .await
    }

    async fn inventory_by_product(&self, product_id: ProductId) -> GatewayResult<InventoryRecord> {
        let id = product_id.to_string();
        self.fetch(
            "inventory.by_product",
            Method::GET,
            &[DATA, INVENTORY, "producto", &id],
        )
        .await
    }

    async fn update_inventory_quantity(
        &self,
        product_id: ProductId,
        payload: &InventoryRecord,
    ) -> GatewayResult<InventoryRecord> {
        let id = product_id.to_string();
        self.fetch_with(
            "inventory.update_quantity",
            Method::PUT,
            &[DATA, INVENTORY, "producto", &id],
            payload,
        )
        .await
    }

    async fn register_movement(&self, movement: &InventoryRecord) -> GatewayResult<InventoryRecord> {
        self.fetch_with(
            "inventory.register_movement",
            Method::POST,
            &[DATA, INVENTORY, "movimientos"],
            movement,
        )
        .await
    }
}

/// Read at most [`MAX_DETAIL_LEN`] bytes of an error body. A failed read is reported in
/// the detail instead of being dropped.
async fn error_detail(mut response: reqwest::Response) -> String {
    let mut bytes = Vec::new();
    while bytes.len() < MAX_DETAIL_LEN {
        match response.chunk().await {
            Ok(Some(chunk)) => bytes.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(e) => {
                let read = detail_text(&bytes);
                return if read.is_empty() {
                    format!("error body unreadable: {e}")
                } else {
                    format!("{read} (error body unreadable: {e})")
                };
            }
        }
    }
    detail_text(&bytes)
}

fn detail_text(bytes: &[u8]) -> String {
    let bytes = &bytes[..bytes.len().min(MAX_DETAIL_LEN)];
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        // Cut inside a multi-byte character: drop the partial tail.
        Err(e) if e.error_len().is_none() => {
            String::from_utf8_lossy(&bytes[..e.valid_up_to()]).into_owned()
        }
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
