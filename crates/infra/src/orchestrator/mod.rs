//! Application-level orchestration over the data gateway.
//!
//! Each service validates its input locally, makes at most one gateway call, and
//! translates the outcome into a [`ServiceError`]. Services hold no state of their own
//! beyond the injected gateway, so they are cheap to share across handlers.
//!
//! ## Error normalization
//!
//! Every public operation runs through [`run`]:
//!
//! ```text
//! operation future
//!   ↓
//! 1. enter an `orchestrator` span (operation name + identifying parameters)
//!   ↓
//! 2. poll the future, catching panics
//!   ↓
//! 3. log communication/internal failures at `error`
//!   ↓
//! Result<T, ServiceError>
//! ```
//!
//! Validation and not-found outcomes are client errors and are not logged here.

pub mod categories;
pub mod inventory;
pub mod products;

pub use categories::CategoryService;
pub use inventory::InventoryService;
pub use products::ProductService;

use futures::FutureExt;
use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use thiserror::Error;
use tracing::Instrument;

use stockwise_core::{CategoryId, DomainError, ProductId};

use crate::gateway::{RemoteFailure, RemoteFailureKind};

/// Which entity a not-found refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Product,
    Category,
    Inventory,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected locally, or a conflict the persistence tier reported for it.
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    NotFound { entity: EntityKind, message: String },

    /// The persistence tier failed or was unreachable.
    #[error("error communicating with the data service")]
    Communication {
        operation: &'static str,
        #[source]
        source: RemoteFailure,
    },

    /// The operation panicked or produced a result that cannot be represented.
    #[error("internal error")]
    Internal { operation: &'static str, detail: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn product_not_found(id: ProductId) -> Self {
        Self::NotFound {
            entity: EntityKind::Product,
            message: format!("product not found with id: {id}"),
        }
    }

    pub fn category_not_found(id: CategoryId) -> Self {
        Self::NotFound {
            entity: EntityKind::Category,
            message: format!("category not found with id: {id}"),
        }
    }

    pub fn category_name_not_found(name: &str) -> Self {
        Self::NotFound {
            entity: EntityKind::Category,
            message: format!("category not found: {name}"),
        }
    }

    pub fn inventory_not_found(product_id: ProductId) -> Self {
        Self::NotFound {
            entity: EntityKind::Inventory,
            message: format!("inventory not found for product id: {product_id}"),
        }
    }

    /// Client-facing message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    fn is_server_error(&self) -> bool {
        matches!(self, Self::Communication { .. } | Self::Internal { .. })
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Overflow(_) => ServiceError::Internal {
                operation: "domain",
                detail: value.to_string(),
            },
            DomainError::Validation(_) | DomainError::InvalidId(_) => {
                ServiceError::Validation(value.message())
            }
        }
    }
}

/// Per-operation mapping of classified remote failures.
///
/// Not-found and conflict only carry meaning where the operation says so; everywhere
/// else they are treated like any other remote failure.
#[derive(Debug, Default)]
pub(crate) struct Translation {
    not_found: Option<ServiceError>,
    conflict: Option<&'static str>,
}

impl Translation {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn not_found(mut self, error: ServiceError) -> Self {
        self.not_found = Some(error);
        self
    }

    /// Turn a conflict into a validation error with this message.
    pub(crate) fn conflict(mut self, message: &'static str) -> Self {
        self.conflict = Some(message);
        self
    }

    pub(crate) fn apply(self, failure: RemoteFailure) -> ServiceError {
        match (failure.kind, self.not_found, self.conflict) {
            (RemoteFailureKind::NotFound, Some(error), _) => error,
            (RemoteFailureKind::Conflict, _, Some(message)) => {
                ServiceError::Validation(message.to_string())
            }
            _ => ServiceError::Communication {
                operation: failure.operation,
                source: failure,
            },
        }
    }
}

/// Run one public operation inside the error-normalizing wrapper.
pub(crate) async fn run<T, F>(operation: &'static str, params: impl Display, fut: F) -> ServiceResult<T>
where
    F: Future<Output = ServiceResult<T>>,
{
    let span = tracing::info_span!("orchestrator", operation, params = %params);

    let outcome = AssertUnwindSafe(fut)
        .catch_unwind()
        .instrument(span.clone())
        .await;

    let result = match outcome {
        Ok(result) => result,
        Err(panic) => Err(ServiceError::Internal {
            operation,
            detail: panic_detail(panic.as_ref()),
        }),
    };

    if let Err(error) = &result {
        if error.is_server_error() {
            span.in_scope(|| log_server_error(error));
        }
    }

    result
}

fn log_server_error(error: &ServiceError) {
    match error {
        ServiceError::Communication { operation, source } => tracing::error!(
            gateway_operation = *operation,
            kind = %source.kind,
            status = source.status,
            detail = %source.detail,
            "data service call failed"
        ),
        ServiceError::Internal { operation, detail } => {
            tracing::error!(operation = *operation, detail = %detail, "operation failed")
        }
        _ => {}
    }
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
