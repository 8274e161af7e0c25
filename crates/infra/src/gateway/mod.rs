//! Typed access to the persistence tier.
//!
//! The orchestrators only ever see [`DataGateway`]; the HTTP client and the in-process
//! fake are interchangeable behind it.

pub mod http;
pub mod in_memory;
pub mod r#trait;

pub use http::HttpDataGateway;
pub use in_memory::InMemoryDataGateway;
pub use r#trait::{DataGateway, GatewayResult, RemoteFailure, RemoteFailureKind};
