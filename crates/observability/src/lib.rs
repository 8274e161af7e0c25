//! Tracing and request correlation (shared setup).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Per-request correlation ids.
pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId};
