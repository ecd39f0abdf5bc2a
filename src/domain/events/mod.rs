//! Domain events
//!
//! Raised by the cart store and the checkout flow on every mutation and
//! drained by the embedding UI via `take_events`.

use crate::checkout::CheckoutStep;

#[derive(Clone, Debug)]
pub enum DomainEvent {
    Cart(CartEvent),
    Checkout(CheckoutEvent),
}

#[derive(Clone, Debug)]
pub enum CartEvent {
    ItemAdded { product_id: i64, quantity: u32 },
    ItemRemoved { product_id: i64 },
    QuantityUpdated { product_id: i64, quantity: u32 },
    Cleared,
}

#[derive(Clone, Debug)]
pub enum CheckoutEvent {
    StepEntered { step: CheckoutStep },
    PaymentAuthorized { transaction_id: String },
    PaymentDeclined { reason: String },
    OrderPlaced { order_id: i64 },
    Aborted,
}
