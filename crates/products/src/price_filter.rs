//! In-process price range filtering over the full catalog.

use rust_decimal::Decimal;

use stockwise_core::{DomainError, DomainResult};

use crate::product::Product;

/// Inclusive price bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceRange {
    min: Option<Decimal>,
    max: Option<Decimal>,
}

impl PriceRange {
    /// Build a range, rejecting `min > max` when both bounds are given.
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> DomainResult<Self> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(DomainError::validation(
                    "minimum price must not be greater than maximum price",
                ));
            }
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Option<Decimal> {
        self.min
    }

    pub fn max(&self) -> Option<Decimal> {
        self.max
    }

    /// A missing price never matches, even for a fully open range.
    pub fn contains(&self, price: Option<Decimal>) -> bool {
        let Some(price) = price else {
            return false;
        };
        if self.min.is_some_and(|lo| price < lo) {
            return false;
        }
        if self.max.is_some_and(|hi| price > hi) {
            return false;
        }
        true
    }

    /// Keep the products whose price falls inside the range, preserving order.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products
            .into_iter()
            .filter(|p| self.contains(p.price))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(cents: Option<i64>) -> Product {
        Product {
            price: cents.map(|c| Decimal::new(c, 2)),
            ..Product::default()
        }
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = PriceRange::new(Some(Decimal::from(10)), Some(Decimal::from(5))).unwrap_err();
        assert_eq!(
            err.message(),
            "minimum price must not be greater than maximum price"
        );
        assert!(PriceRange::new(Some(Decimal::from(5)), Some(Decimal::from(5))).is_ok());
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = PriceRange::new(Some(Decimal::from(10)), Some(Decimal::from(20))).unwrap();
        assert!(range.contains(Some(Decimal::from(10))));
        assert!(range.contains(Some(Decimal::from(20))));
        assert!(!range.contains(Some(Decimal::new(2001, 2))));
        assert!(!range.contains(Some(Decimal::new(999, 2))));
    }

    #[test]
    fn missing_price_is_excluded() {
        let open = PriceRange::default();
        let kept = open.apply(vec![priced(Some(100)), priced(None), priced(Some(50))]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].price, Some(Decimal::new(100, 2)));
    }

    #[test]
    fn one_sided_ranges() {
        let at_least = PriceRange::new(Some(Decimal::from(1)), None).unwrap();
        let at_most = PriceRange::new(None, Some(Decimal::from(1))).unwrap();
        let products = vec![priced(Some(50)), priced(Some(150))];
        assert_eq!(at_least.apply(products.clone()).len(), 1);
        assert_eq!(at_most.apply(products)[0].price, Some(Decimal::new(50, 2)));
    }
}
