use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::str::FromStr;

use stockwise_core::DomainError;
use stockwise_inventory::InventoryRecord;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `PUT /api/reportes/{productoId}`.
///
/// `cantidad` arrives either as a number or as a numeric string; anything else is
/// treated as missing and left to the quantity validation.
#[derive(Debug, Default, Deserialize)]
pub struct QuantityUpdateRequest {
    #[serde(default)]
    pub cantidad: Option<JsonValue>,
}

impl QuantityUpdateRequest {
    pub fn quantity(&self) -> Option<i32> {
        match self.cantidad.as_ref()? {
            JsonValue::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            JsonValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Request-body rules for `POST /api/reportes/movimientos`.
///
/// Only the payload shape is checked here; the product reference is checked by the
/// inventory service.
pub fn check_movement(movement: &InventoryRecord) -> Result<(), DomainError> {
    match movement.quantity {
        None => return Err(DomainError::validation("quantity is required")),
        Some(q) if q < 0 => return Err(DomainError::validation("quantity must not be negative")),
        Some(_) => {}
    }
    if matches!(movement.minimum_stock, Some(minimum) if minimum < 0) {
        return Err(DomainError::validation("minimum stock must not be negative"));
    }
    Ok(())
}

/// Query of `GET /api/productos/filtros`.
#[derive(Debug, Default, Deserialize)]
pub struct PriceFilterQuery {
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
}

impl PriceFilterQuery {
    pub fn bounds(&self) -> Result<(Option<Decimal>, Option<Decimal>), DomainError> {
        Ok((
            parse_price("minPrice", self.min_price.as_deref())?,
            parse_price("maxPrice", self.max_price.as_deref())?,
        ))
    }
}

fn parse_price(field: &str, raw: Option<&str>) -> Result<Option<Decimal>, DomainError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Decimal::from_str(value)
            .map(Some)
            .map_err(|_| DomainError::validation(format!("{field} must be a number, got {value:?}"))),
    }
}
