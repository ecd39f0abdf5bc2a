//! Aggregates module
pub mod cart;
pub mod order;
pub mod product;

pub use cart::{Cart, CartLine, CartSummary, StockCheck};
pub use order::{can_actor_change_status, Order, OrderItem, OrderPaymentInfo, OrderStatus};
pub use product::ProductSnapshot;
