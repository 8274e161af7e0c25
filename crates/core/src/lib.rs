//! `stockwise-core`: shared catalog building blocks.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no storage).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, InventoryId, ProductId};
