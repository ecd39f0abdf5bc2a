//! Vitrina Storefront Client
//!
//! Client-side core for a REST-backed storefront. The embedding UI layer
//! owns routing, form rendering and notifications; this crate owns the
//! state that has rules:
//!
//! - Shopping cart with price snapshots, derived totals and persistence
//! - Pre-checkout stock validation
//! - A guarded checkout state machine with simulated payment authorization
//! - The order status workflow mirrored from the backend
//! - Typed wrappers over the backend REST endpoints

pub mod checkout;
pub mod config;
pub mod domain;
pub mod payment;
pub mod services;
pub mod session;
pub mod storage;
pub mod store;

pub use checkout::{CheckoutError, CheckoutFlow, CheckoutStep, PaymentInfo, Redirect, ShippingInfo};
pub use config::Config;
pub use domain::aggregates::cart::{Cart, CartLine, CartSummary, StockCheck};
pub use domain::aggregates::order::{can_actor_change_status, Order, OrderStatus};
pub use domain::aggregates::product::ProductSnapshot;
pub use domain::value_objects::{Money, Role};
pub use payment::{authorize, Authorization, DeclineReason};
pub use services::{ApiClient, ApiError};
pub use session::{AuthSession, User};
pub use storage::{FileStorage, MemoryStorage, SharedStorage, Storage};
pub use store::{CartStore, Outcome};
