//! Cart store
//!
//! Wraps the cart aggregate with durable persistence and domain events.
//! Every mutation goes through here, returns a renderable outcome instead
//! of an error, and is written to storage before it returns. A storage
//! failure is logged and the in-memory state stays authoritative.

use tracing::warn;

use crate::checkout::ShippingInfo;
use crate::domain::aggregates::cart::{Cart, CartLine, CartSummary, StockCheck};
use crate::domain::aggregates::product::ProductSnapshot;
use crate::domain::events::{CartEvent, DomainEvent};
use crate::services::orders::{CreateOrderRequest, OrderItemInput, PaymentData};
use crate::storage::{keys, SharedStorage};

/// Success/failure result of a cart mutation, ready to render.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

pub struct CartStore {
    cart: Cart,
    storage: SharedStorage,
    events: Vec<DomainEvent>,
}

impl CartStore {
    /// Loads the persisted cart. A corrupt payload is discarded and its key
    /// removed, leaving an empty cart.
    pub fn new(storage: SharedStorage) -> Self {
        let cart = match storage.get(keys::CART) {
            Some(raw) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => Cart::from_lines(lines),
                Err(e) => {
                    warn!(error = %e, "discarding corrupt persisted cart");
                    if let Err(e) = storage.remove(keys::CART) {
                        warn!(error = %e, "failed to remove corrupt cart");
                    }
                    Cart::new()
                }
            },
            None => Cart::new(),
        };
        Self { cart, storage, events: Vec::new() }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Derived totals, recomputed on every call.
    pub fn summary(&self) -> CartSummary {
        self.cart.summary()
    }

    pub fn add_item(&mut self, product: &ProductSnapshot, quantity: u32) -> Outcome {
        if quantity == 0 {
            return Outcome::failed("Quantity must be at least 1");
        }
        self.cart.add(product, quantity);
        self.raise(CartEvent::ItemAdded { product_id: product.id, quantity });
        self.persist();
        Outcome::ok(format!("{} added to cart", product.name))
    }

    /// Removing a product that is not in the cart is a successful no-op.
    pub fn remove_item(&mut self, product_id: i64) -> Outcome {
        if self.cart.remove(product_id) {
            self.raise(CartEvent::ItemRemoved { product_id });
            self.persist();
        }
        Outcome::ok("Item removed from cart")
    }

    /// Zero behaves as removal, matching what a quantity stepper does when
    /// decremented past one.
    pub fn set_quantity(&mut self, product_id: i64, quantity: u32) -> Outcome {
        if quantity == 0 {
            return self.remove_item(product_id);
        }
        if self.cart.set_quantity(product_id, quantity) {
            self.raise(CartEvent::QuantityUpdated { product_id, quantity });
            self.persist();
        }
        Outcome::ok("Quantity updated")
    }

    pub fn clear(&mut self) -> Outcome {
        self.cart.clear();
        self.raise(CartEvent::Cleared);
        if let Err(e) = self.storage.remove(keys::CART) {
            warn!(error = %e, "failed to clear persisted cart");
        }
        Outcome::ok("Cart cleared")
    }

    pub fn validate_stock(&self) -> StockCheck {
        self.cart.validate_stock()
    }

    pub fn validate_stock_with(&self, catalog: &[ProductSnapshot]) -> StockCheck {
        self.cart.validate_stock_with(catalog)
    }

    /// Builds exactly the payload `POST /api/orders` expects, decoupling
    /// the checkout UI from the wire shape.
    pub fn prepare_order_payload(
        &self,
        shipping: &ShippingInfo,
        payment: PaymentData,
    ) -> CreateOrderRequest {
        CreateOrderRequest {
            items: self
                .cart
                .lines()
                .iter()
                .map(|l| OrderItemInput { product_id: l.product_id, quantity: l.quantity })
                .collect(),
            shipping_data: shipping.clone(),
            payment_data: payment,
        }
    }

    /// Drains the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise(&mut self, event: CartEvent) {
        self.events.push(DomainEvent::Cart(event));
    }

    fn persist(&self) {
        match serde_json::to_string(self.cart.lines()) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(keys::CART, &raw) {
                    warn!(error = %e, "failed to persist cart");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize cart"),
        }
    }
}
