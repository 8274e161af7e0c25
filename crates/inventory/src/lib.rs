//! Inventory domain module.
//!
//! One inventory record per product. Quantity updates and movement registrations are
//! two distinct writes that resolve to the same record in the persistence tier; this
//! crate only shapes and validates their payloads.

pub mod record;

pub use record::{quantity_update, validate_movement, InventoryRecord};
