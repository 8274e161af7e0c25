use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockwise_core::{DomainError, DomainResult, Entity, ProductId};

use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

/// Product as returned by the persistence tier.
///
/// Every attribute is nullable on the wire; consumers (statistics, price filter)
/// decide how missing values count.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "precio", default)]
    pub price: Option<Decimal>,
    /// Denormalized category reference (by name, not by id).
    #[serde(rename = "categoriaNombre", default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
    /// Derived by the persistence tier: stock below the record's minimum.
    #[serde(rename = "stockBajo", default)]
    pub low_stock: Option<bool>,
}

impl Product {
    /// Reference to an existing product by id only (used inside inventory payloads).
    pub fn reference(id: ProductId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }
}

/// Create/update payload for a product.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductRequest {
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "precio", default)]
    pub price: Option<Decimal>,
    #[serde(rename = "categoriaNombre", default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
}

/// Validate a product payload before it is sent to the persistence tier.
///
/// Create and update share one rule set. Checks run in a fixed order and the first
/// failure wins, so identical input always produces the identical message.
pub fn validate_product(request: &ProductRequest) -> DomainResult<()> {
    match request.name.as_deref().map(str::trim) {
        None | Some("") => return Err(DomainError::validation("product name is required")),
        Some(name) if name.chars().count() > MAX_NAME_LEN => {
            return Err(DomainError::validation(
                "product name must not exceed 100 characters",
            ));
        }
        Some(_) => {}
    }

    let price = request
        .price
        .ok_or_else(|| DomainError::validation("product price is required"))?;
    if price <= Decimal::ZERO {
        return Err(DomainError::validation("price must be greater than zero"));
    }

    match request.category_name.as_deref().map(str::trim) {
        None | Some("") => return Err(DomainError::validation("category name is required")),
        Some(category) if category.chars().count() > MAX_NAME_LEN => {
            return Err(DomainError::validation(
                "category name must not exceed 100 characters",
            ));
        }
        Some(_) => {}
    }

    if matches!(request.stock, Some(stock) if stock < 0) {
        return Err(DomainError::validation("stock must not be negative"));
    }

    if let Some(description) = &request.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(DomainError::validation(
                "description must not exceed 500 characters",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_request() -> ProductRequest {
        ProductRequest {
            name: Some("Laptop".to_string()),
            description: Some("14 inch".to_string()),
            price: Some(Decimal::new(99_999, 2)),
            category_name: Some("Tech".to_string()),
            stock: Some(3),
        }
    }

    fn message(result: DomainResult<()>) -> String {
        result.unwrap_err().message()
    }

    #[test]
    fn accepts_valid_request() {
        assert!(validate_product(&valid_request()).is_ok());
    }

    #[test]
    fn zero_price_is_rejected() {
        let req = ProductRequest {
            price: Some(Decimal::ZERO),
            ..valid_request()
        };
        assert_eq!(
            message(validate_product(&req)),
            "price must be greater than zero"
        );
    }

    #[test]
    fn missing_price_is_rejected() {
        let req = ProductRequest {
            price: None,
            ..valid_request()
        };
        assert_eq!(
            message(validate_product(&req)),
            "product price is required"
        );
    }

    #[test]
    fn missing_name_is_rejected() {
        let req = ProductRequest {
            name: None,
            ..valid_request()
        };
        assert_eq!(
            message(validate_product(&req)),
            "product name is required"
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let req = ProductRequest {
            name: Some("   ".to_string()),
            ..valid_request()
        };
        assert_eq!(message(validate_product(&req)), "product name is required");
    }

    #[test]
    fn long_name_is_rejected() {
        let req = ProductRequest {
            name: Some("x".repeat(101)),
            ..valid_request()
        };
        assert_eq!(
            message(validate_product(&req)),
            "product name must not exceed 100 characters"
        );

        let at_limit = ProductRequest {
            name: Some("ñ".repeat(100)),
            ..valid_request()
        };
        assert!(validate_product(&at_limit).is_ok());
    }

    #[test]
    fn category_and_stock_rules() {
        let no_category = ProductRequest {
            category_name: Some(" ".to_string()),
            ..valid_request()
        };
        assert_eq!(
            message(validate_product(&no_category)),
            "category name is required"
        );

        let negative_stock = ProductRequest {
            stock: Some(-1),
            ..valid_request()
        };
        assert_eq!(
            message(validate_product(&negative_stock)),
            "stock must not be negative"
        );

        let no_stock = ProductRequest {
            stock: None,
            ..valid_request()
        };
        assert!(validate_product(&no_stock).is_ok());
    }

    #[test]
    fn long_description_is_rejected() {
        let req = ProductRequest {
            description: Some("d".repeat(501)),
            ..valid_request()
        };
        assert_eq!(
            message(validate_product(&req)),
            "description must not exceed 500 characters"
        );
    }

    #[test]
    fn deserializes_persistence_field_names() {
        let json = r#"{"id":7,"nombre":"Mouse","precio":12.5,"categoriaNombre":"Tech","stock":4,"stockBajo":true}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, Some(ProductId::new(7)));
        assert_eq!(product.price, Some(Decimal::new(125, 1)));
        assert_eq!(product.low_stock, Some(true));
        assert_eq!(product.description, None);
        assert!(product.is_persisted());
        assert!(!Product::default().is_persisted());
    }

    proptest! {
        /// Property: validation is a pure function of its input.
        #[test]
        fn validation_is_deterministic(
            name in proptest::option::of("[ A-Za-z]{0,120}"),
            cents in proptest::option::of(-1_000i64..1_000_000),
            category in proptest::option::of("[ A-Za-z]{0,20}"),
            stock in proptest::option::of(-5i32..500),
        ) {
            let req = ProductRequest {
                name,
                description: None,
                price: cents.map(|c| Decimal::new(c, 2)),
                category_name: category,
                stock,
            };
            let first = validate_product(&req);
            let second = validate_product(&req);
            prop_assert_eq!(first, second);
        }

        /// Property: a non-positive price never passes.
        #[test]
        fn non_positive_price_never_passes(cents in -1_000_000i64..=0) {
            let req = ProductRequest {
                price: Some(Decimal::new(cents, 2)),
                ..valid_request()
            };
            prop_assert!(validate_product(&req).is_err());
        }
    }
}
