//! Orders as mirrored from the backend, plus the status workflow.
//!
//! Order status is server-owned. The client keeps the same transition table
//! the backend enforces so the UI only offers legal moves; the backend
//! remains the authority and re-validates every change.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::checkout::ShippingInfo;
use crate::domain::value_objects::Role;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Legal forward transitions from this status. Delivered and cancelled
    /// are terminal.
    pub fn valid_transitions(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Shipped, OrderStatus::Cancelled],
            OrderStatus::Shipped => &[OrderStatus::Delivered, OrderStatus::Cancelled],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.valid_transitions().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{name}")
    }
}

/// Whether `role` may change an order currently in `status`. Staff only,
/// and never once the order reached a terminal state. This gates which
/// controls render; the backend re-checks on every mutation.
pub fn can_actor_change_status(role: Role, status: OrderStatus) -> bool {
    role.can_manage() && matches!(status, OrderStatus::Pending | OrderStatus::Shipped)
}

/// An order as returned by the backend order endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct Order {
    pub id: i64,
    pub status: OrderStatus,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_info: Option<ShippingInfo>,
    #[serde(default)]
    pub payment_info: Option<OrderPaymentInfo>,
    #[serde(default)]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OrderPaymentInfo {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub card_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert_eq!(
            OrderStatus::Pending.valid_transitions(),
            &[OrderStatus::Shipped, OrderStatus::Cancelled]
        );
        assert_eq!(
            OrderStatus::Shipped.valid_transitions(),
            &[OrderStatus::Delivered, OrderStatus::Cancelled]
        );
        assert!(OrderStatus::Delivered.valid_transitions().is_empty());
        assert!(OrderStatus::Cancelled.valid_transitions().is_empty());
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn test_role_gating() {
        assert!(can_actor_change_status(Role::Admin, OrderStatus::Pending));
        assert!(can_actor_change_status(Role::Seller, OrderStatus::Shipped));
        assert!(!can_actor_change_status(Role::Client, OrderStatus::Pending));
        assert!(!can_actor_change_status(Role::Admin, OrderStatus::Delivered));
        assert!(!can_actor_change_status(Role::Seller, OrderStatus::Cancelled));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&OrderStatus::Pending).unwrap(), "\"pending\"");
        let parsed: OrderStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(parsed, OrderStatus::Shipped);
    }
}
