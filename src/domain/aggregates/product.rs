//! Catalog product snapshots

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Money;

/// A product as seen while browsing the catalog. Cart lines copy the fields
/// they need at add time, so later catalog changes do not retroactively edit
/// a cart; the stock figure is advisory until the backend re-checks it at
/// order creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    pub stock: u32,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ProductSnapshot {
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_stock_flag() {
        let mut p = ProductSnapshot {
            id: 1,
            name: "Widget".into(),
            description: String::new(),
            price: Money::cop(Decimal::from(1000u32)),
            stock: 3,
            image_url: None,
        };
        assert!(p.is_in_stock());
        p.stock = 0;
        assert!(!p.is_in_stock());
    }
}
