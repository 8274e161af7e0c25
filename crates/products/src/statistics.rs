//! Category-level reporting metrics.
//!
//! Statistics are derived per request from the category's current product list and
//! never stored. Two calls may disagree if the catalog changed in between.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use stockwise_core::{DomainError, DomainResult};

use crate::product::Product;

/// Stock level at or below which a product without a low-stock flag counts as low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

/// Metrics for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatistics {
    #[serde(rename = "categoriaNombre")]
    pub category_name: String,
    #[serde(rename = "totalProductos")]
    pub total_products: u64,
    #[serde(rename = "totalStock")]
    pub total_stock: i64,
    #[serde(rename = "valorTotalInventario")]
    pub total_inventory_value: Decimal,
    #[serde(rename = "precioPromedio")]
    pub average_price: Decimal,
    #[serde(rename = "precioMinimo")]
    pub min_price: Decimal,
    #[serde(rename = "precioMaximo")]
    pub max_price: Decimal,
    #[serde(rename = "productosConStockBajo")]
    pub low_stock_count: u64,
    #[serde(rename = "porcentajeProductosConStockBajo")]
    pub low_stock_percentage: f64,
}

impl CategoryStatistics {
    /// All-zero metrics (a category with no products).
    pub fn empty(category_name: impl Into<String>) -> Self {
        Self {
            category_name: category_name.into(),
            total_products: 0,
            total_stock: 0,
            total_inventory_value: Decimal::ZERO,
            average_price: Decimal::ZERO,
            min_price: Decimal::ZERO,
            max_price: Decimal::ZERO,
            low_stock_count: 0,
            low_stock_percentage: 0.0,
        }
    }

    /// Aggregate the given products. Missing prices and stocks count as zero in sums;
    /// price statistics only consider products that have a price.
    ///
    /// Fails with [`DomainError::Overflow`] when a money total leaves the decimal range.
    pub fn compute(category_name: impl Into<String>, products: &[Product]) -> DomainResult<Self> {
        if products.is_empty() {
            return Ok(Self::empty(category_name));
        }

        let total_products = products.len() as u64;

        let total_stock: i64 = products
            .iter()
            .map(|p| i64::from(p.stock.unwrap_or(0)))
            .sum();

        let mut inventory_value = Decimal::ZERO;
        for product in products {
            let line = product
                .price
                .unwrap_or(Decimal::ZERO)
                .checked_mul(Decimal::from(product.stock.unwrap_or(0)))
                .ok_or_else(|| DomainError::overflow("price x stock"))?;
            inventory_value = inventory_value
                .checked_add(line)
                .ok_or_else(|| DomainError::overflow("total inventory value"))?;
        }
        let total_inventory_value = to_money(inventory_value);

        let prices: Vec<Decimal> = products.iter().filter_map(|p| p.price).collect();
        let (average_price, min_price, max_price) = match (prices.iter().min(), prices.iter().max()) {
            (Some(&min), Some(&max)) => {
                let sum = prices
                    .iter()
                    .try_fold(Decimal::ZERO, |acc, price| acc.checked_add(*price))
                    .ok_or_else(|| DomainError::overflow("price sum"))?;
                let average = to_money(sum / Decimal::from(prices.len() as u64));
                (average, min, max)
            }
            _ => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        };

        let low_stock_count = products.iter().filter(|p| is_low_stock(p)).count() as u64;
        let percentage = low_stock_count as f64 * 100.0 / total_products as f64;

        Ok(Self {
            category_name: category_name.into(),
            total_products,
            total_stock,
            total_inventory_value,
            average_price,
            min_price,
            max_price,
            low_stock_count,
            // Plain float rounding here, unlike the half-up money fields.
            low_stock_percentage: (percentage * 100.0).round() / 100.0,
        })
    }
}

/// The persistence tier's flag wins; without it, fall back to the fixed threshold.
fn is_low_stock(product: &Product) -> bool {
    match product.low_stock {
        Some(flag) => flag,
        None => product
            .stock
            .is_some_and(|stock| stock <= DEFAULT_LOW_STOCK_THRESHOLD),
    }
}

/// Two decimal places, half-up, always carrying the scale (`5000` becomes `5000.00`).
fn to_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(price: Option<i64>, stock: Option<i32>, low_stock: Option<bool>) -> Product {
        Product {
            price: price.map(Decimal::from),
            stock,
            low_stock,
            category_name: Some("Tech".to_string()),
            ..Product::default()
        }
    }

    #[test]
    fn empty_category_is_all_zero() {
        let stats = CategoryStatistics::compute("Tech", &[]).unwrap();
        assert_eq!(stats, CategoryStatistics::empty("Tech"));
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.total_stock, 0);
        assert!(stats.total_inventory_value.is_zero());
        assert!(stats.average_price.is_zero());
        assert!(stats.min_price.is_zero());
        assert!(stats.max_price.is_zero());
        assert_eq!(stats.low_stock_count, 0);
        assert_eq!(stats.low_stock_percentage, 0.0);
    }

    #[test]
    fn tech_scenario() {
        let products = vec![
            product(Some(100), Some(10), Some(true)),
            product(Some(200), Some(20), Some(false)),
        ];
        let stats = CategoryStatistics::compute("Tech", &products).unwrap();

        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.total_stock, 30);
        assert_eq!(stats.total_inventory_value, Decimal::new(500_000, 2));
        assert_eq!(stats.total_inventory_value.to_string(), "5000.00");
        assert_eq!(stats.average_price, Decimal::new(15_000, 2));
        assert_eq!(stats.min_price, Decimal::from(100));
        assert_eq!(stats.max_price, Decimal::from(200));
        assert_eq!(stats.low_stock_count, 1);
        assert_eq!(stats.low_stock_percentage, 50.0);
    }

    #[test]
    fn missing_values_count_as_zero() {
        let products = vec![
            product(None, Some(5), Some(false)),
            product(Some(3), None, Some(false)),
        ];
        let stats = CategoryStatistics::compute("Misc", &products).unwrap();
        assert_eq!(stats.total_stock, 5);
        assert!(stats.total_inventory_value.is_zero());
        assert_eq!(stats.average_price, Decimal::new(300, 2));
        assert_eq!(stats.min_price, Decimal::from(3));
        assert_eq!(stats.max_price, Decimal::from(3));
    }

    #[test]
    fn no_prices_means_zero_price_stats() {
        let stats = CategoryStatistics::compute("Misc", &[product(None, Some(1), None)]).unwrap();
        assert!(stats.average_price.is_zero());
        assert!(stats.min_price.is_zero());
        assert!(stats.max_price.is_zero());
    }

    #[test]
    fn threshold_fallback_when_flag_absent() {
        let products = vec![
            product(Some(1), Some(10), None),
            product(Some(1), Some(11), None),
            product(Some(1), None, None),
        ];
        let stats = CategoryStatistics::compute("Misc", &products).unwrap();
        assert_eq!(stats.low_stock_count, 1);
        assert_eq!(stats.low_stock_percentage, 33.33);
    }

    #[test]
    fn percentage_uses_float_rounding() {
        // 201 of 20000 is 1.005 %, which half-up decimal rounding would turn into 1.01.
        let products: Vec<Product> = (0..20_000)
            .map(|i| product(Some(1), Some(50), Some(i < 201)))
            .collect();
        let stats = CategoryStatistics::compute("Misc", &products).unwrap();
        assert_eq!(stats.low_stock_count, 201);
        assert_eq!(stats.low_stock_percentage, 1.0);
    }

    #[test]
    fn overflowing_inventory_value_is_an_error() {
        let products = vec![Product {
            price: Some(Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0)),
            stock: Some(1_000_000_000),
            ..Product::default()
        }];
        let err = CategoryStatistics::compute("Big", &products).unwrap_err();
        assert!(matches!(err, DomainError::Overflow(_)));
    }

    #[test]
    fn overflowing_price_sum_is_an_error() {
        // No stock, so only the average's running sum can overflow.
        let huge = Product {
            price: Some(Decimal::MAX),
            ..Product::default()
        };
        let products = vec![huge.clone(), huge];
        let err = CategoryStatistics::compute("Big", &products).unwrap_err();
        assert!(matches!(err, DomainError::Overflow(_)));
    }

    #[test]
    fn average_rounds_half_up() {
        let products = vec![
            Product {
                price: Some(Decimal::new(1, 2)),
                ..Product::default()
            },
            Product {
                price: Some(Decimal::new(2, 2)),
                ..Product::default()
            },
        ];
        // (0.01 + 0.02) / 2 = 0.015 -> 0.02
        let stats = CategoryStatistics::compute("Misc", &products).unwrap();
        assert_eq!(stats.average_price, Decimal::new(2, 2));
    }

    #[test]
    fn inventory_value_rounds_half_up() {
        let products = vec![Product {
            price: Some(Decimal::new(1_005, 3)),
            stock: Some(1),
            ..Product::default()
        }];
        let stats = CategoryStatistics::compute("Misc", &products).unwrap();
        assert_eq!(stats.total_inventory_value.to_string(), "1.01");
    }

    #[test]
    fn serializes_report_keys() {
        let json = serde_json::to_value(CategoryStatistics::empty("Tech")).unwrap();
        for key in [
            "categoriaNombre",
            "totalProductos",
            "totalStock",
            "valorTotalInventario",
            "precioPromedio",
            "precioMinimo",
            "precioMaximo",
            "productosConStockBajo",
            "porcentajeProductosConStockBajo",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    fn arb_product() -> impl Strategy<Value = Product> {
        (
            proptest::option::of(1i64..1_000_000),
            proptest::option::of(0i32..10_000),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(|(cents, stock, low_stock)| Product {
                price: cents.map(|c| Decimal::new(c, 2)),
                stock,
                low_stock,
                ..Product::default()
            })
    }

    proptest! {
        /// Property: total value is the half-up rounded sum of price x stock.
        #[test]
        fn total_value_matches_sum(products in proptest::collection::vec(arb_product(), 1..40)) {
            let expected = products
                .iter()
                .map(|p| p.price.unwrap_or_default() * Decimal::from(p.stock.unwrap_or(0)))
                .sum::<Decimal>()
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            let stats = CategoryStatistics::compute("P", &products).unwrap();
            prop_assert_eq!(stats.total_inventory_value, expected);
            prop_assert_eq!(stats.total_products, products.len() as u64);
        }

        /// Property: statistics do not depend on the order of the product list.
        #[test]
        fn order_does_not_matter(products in proptest::collection::vec(arb_product(), 0..40)) {
            let mut reversed = products.clone();
            reversed.reverse();
            let a = CategoryStatistics::compute("P", &products).unwrap();
            let b = CategoryStatistics::compute("P", &reversed).unwrap();
            prop_assert_eq!(a, b);
        }

        /// Property: the low-stock percentage stays within [0, 100].
        #[test]
        fn percentage_is_bounded(products in proptest::collection::vec(arb_product(), 1..40)) {
            let stats = CategoryStatistics::compute("P", &products).unwrap();
            prop_assert!(stats.low_stock_percentage >= 0.0);
            prop_assert!(stats.low_stock_percentage <= 100.0);
            prop_assert!(stats.low_stock_count <= stats.total_products);
        }
    }
}
