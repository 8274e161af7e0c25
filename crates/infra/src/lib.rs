//! Infrastructure layer: data gateway, its configuration, and the orchestrators that
//! sit between the HTTP surface and the persistence tier.

pub mod config;
pub mod gateway;
pub mod orchestrator;


pub use config::{ConfigError, GatewayConfig};
pub use gateway::{
    DataGateway, GatewayResult, HttpDataGateway, InMemoryDataGateway, RemoteFailure,
    RemoteFailureKind,
};
pub use orchestrator::{
    CategoryService, EntityKind, InventoryService, ProductService, ServiceError, ServiceResult,
};
