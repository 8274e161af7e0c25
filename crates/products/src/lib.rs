//! Products domain module (catalog).
//!
//! This crate contains the catalog's business rules (validation, price filtering and
//! category statistics), implemented purely as deterministic logic (no IO, no HTTP,
//! no storage). Product and category state is owned by the persistence tier; the
//! types here are the shapes exchanged with it.

pub mod category;
pub mod price_filter;
pub mod product;
pub mod statistics;

pub use category::{normalize_category_name, validate_category, Category};
pub use price_filter::PriceRange;
pub use product::{validate_product, Product, ProductRequest};
pub use statistics::{CategoryStatistics, DEFAULT_LOW_STOCK_THRESHOLD};

/// Maximum length (in characters) of product and category names.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length (in characters) of free-text descriptions.
pub const MAX_DESCRIPTION_LEN: usize = 500;
