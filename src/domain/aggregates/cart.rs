//! Cart Aggregate
//!
//! Single source of truth for the active cart. Each product appears in at
//! most one line, every line holds a positive quantity, and the price on a
//! line is the snapshot taken when the product was added. Totals are derived
//! fresh on every call and never stored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::product::ProductSnapshot;
use crate::domain::value_objects::Money;

/// IVA rate applied to the subtotal.
fn tax_rate() -> Decimal {
    Decimal::new(19, 2)
}

/// Flat fee charged when the order does not ship free.
fn shipping_fee() -> Decimal {
    Decimal::new(1099, 2)
}

/// Subtotals at or above this amount ship free. The boundary is inclusive.
fn free_shipping_threshold() -> Decimal {
    Decimal::from(100_000u32)
}

/// One product's accumulated quantity within the cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub unit_price: Money,
    pub stock: u32,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Derived totals for the current cart contents.
#[derive(Clone, Debug, PartialEq)]
pub struct CartSummary {
    pub total_items: u32,
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
    pub has_items: bool,
    pub free_shipping: bool,
}

/// Result of the advisory pre-checkout stock check.
#[derive(Clone, Debug, PartialEq)]
pub struct StockCheck {
    pub valid: bool,
    pub offending: Vec<String>,
}

impl StockCheck {
    pub fn message(&self) -> Option<String> {
        if self.valid {
            None
        } else {
            Some(format!("Insufficient stock for: {}", self.offending.join(", ")))
        }
    }
}

#[derive(Clone, Debug)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: String,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Self { lines: Vec::new(), currency: "COP".to_string() }
    }

    /// Rebuilds a cart from persisted lines, dropping empty lines and
    /// merging any duplicated product ids.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            match cart.lines.iter_mut().find(|l| l.product_id == line.product_id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
                None => cart.lines.push(line),
            }
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.lines.iter().any(|l| l.product_id == product_id)
    }

    pub fn quantity_of(&self, product_id: i64) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map_or(0, |l| l.quantity)
    }

    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Adds `quantity` units of the product, merging into an existing line
    /// when the product is already in the cart. A zero quantity is a no-op.
    pub fn add(&mut self, product: &ProductSnapshot, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price.clone(),
                stock: product.stock,
                quantity,
                added_at: Utc::now(),
            }),
        }
    }

    /// Removes the product's line. Returns whether a line was present.
    pub fn remove(&mut self, product_id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() != before
    }

    /// Overwrites the quantity of an existing line. Zero removes the line,
    /// so no zero-quantity row is ever retained. Returns whether a line was
    /// present.
    pub fn set_quantity(&mut self, product_id: i64, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Computes the derived totals from scratch.
    pub fn summary(&self) -> CartSummary {
        let total_items = self.total_items();
        let subtotal: Decimal = self.lines.iter().map(|l| l.line_total().amount()).sum();
        let free_shipping = subtotal >= free_shipping_threshold();
        let shipping = if free_shipping { Decimal::ZERO } else { shipping_fee() };
        let tax = subtotal * tax_rate();
        let total = subtotal + shipping + tax;
        CartSummary {
            total_items,
            subtotal: Money::new(subtotal, &self.currency),
            shipping: Money::new(shipping, &self.currency),
            tax: Money::new(tax, &self.currency),
            total: Money::new(total, &self.currency),
            has_items: total_items > 0,
            free_shipping,
        }
    }

    /// Checks requested quantities against the stock snapshot captured at
    /// add time. Advisory only; the backend re-checks at order creation.
    pub fn validate_stock(&self) -> StockCheck {
        self.validate_stock_with(&[])
    }

    /// Same check, but a fresher catalog snapshot wins over the figure
    /// embedded in the line when the product appears in `catalog`.
    pub fn validate_stock_with(&self, catalog: &[ProductSnapshot]) -> StockCheck {
        let offending: Vec<String> = self
            .lines
            .iter()
            .filter(|line| {
                let stock = catalog
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .map_or(line.stock, |p| p.stock);
                line.quantity > stock
            })
            .map(|line| line.name.clone())
            .collect();
        StockCheck { valid: offending.is_empty(), offending }
    }
}
