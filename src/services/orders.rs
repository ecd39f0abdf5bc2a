//! Order service: creation, listing and the staff status workflow.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use super::{rejected, ApiClient, ApiError};
use crate::checkout::ShippingInfo;
use crate::domain::aggregates::order::{can_actor_change_status, Order, OrderStatus};
use crate::domain::value_objects::Role;

/// Exactly the body `POST /api/orders` expects.
#[derive(Clone, Debug, Serialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemInput>,
    pub shipping_data: ShippingInfo,
    pub payment_data: PaymentData,
}

#[derive(Clone, Debug, Serialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct PaymentData {
    pub transaction_id: String,
    pub card_type: String,
    pub card_number: String,
}

/// The backend's acknowledgement of a created order.
#[derive(Clone, Debug, Deserialize)]
pub struct OrderConfirmation {
    pub id: i64,
    pub total_amount: Decimal,
}

/// A confirmed order as held by the checkout flow.
#[derive(Clone, Debug)]
pub struct PlacedOrder {
    pub id: i64,
    pub total_amount: Decimal,
    pub receipt_url: Option<String>,
}

#[derive(Deserialize)]
struct CreateOrderResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    order: Option<OrderConfirmation>,
    #[serde(default)]
    receipt_url: Option<String>,
}

#[derive(Deserialize)]
struct OrdersResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    orders: Vec<Order>,
}

#[derive(Deserialize)]
struct OrderResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    order: Option<Order>,
}

#[derive(Deserialize)]
struct StatusResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct StatusBody {
    status: OrderStatus,
}

#[derive(Debug, Error)]
pub enum OrderUpdateError {
    #[error("role {role} may not change a {status} order")]
    NotPermitted { role: Role, status: OrderStatus },
    #[error("cannot move an order from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct OrdersService {
    client: Arc<ApiClient>,
}

impl OrdersService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Creates the order. A failed call leaves no partial order behind;
    /// callers retry with the same request.
    #[instrument(skip(self, request))]
    pub async fn create(&self, request: &CreateOrderRequest) -> Result<PlacedOrder, ApiError> {
        let resp: CreateOrderResponse = self.client.post("/api/orders", request).await?;
        match (resp.success, resp.order) {
            (true, Some(order)) => Ok(PlacedOrder {
                id: order.id,
                total_amount: order.total_amount,
                receipt_url: resp.receipt_url,
            }),
            _ => Err(rejected(resp.message, "order creation failed")),
        }
    }

    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let resp: OrdersResponse = self.client.get("/api/orders/my-orders").await?;
        if resp.success {
            Ok(resp.orders)
        } else {
            Err(rejected(resp.message, "failed to load orders"))
        }
    }

    /// All orders, staff view.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        let resp: OrdersResponse = self.client.get("/api/orders").await?;
        if resp.success {
            Ok(resp.orders)
        } else {
            Err(rejected(resp.message, "failed to load orders"))
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Order, ApiError> {
        let resp: OrderResponse = self.client.get(&format!("/api/orders/{id}")).await?;
        match (resp.success, resp.order) {
            (true, Some(order)) => Ok(order),
            _ => Err(rejected(resp.message, "order not found")),
        }
    }

    /// Moves an order through the status workflow. The transition table and
    /// the actor's role are checked before any round trip; the backend
    /// validates again on its side.
    #[instrument(skip(self, order), fields(order_id = order.id))]
    pub async fn update_status(
        &self,
        order: &Order,
        next: OrderStatus,
        actor: Role,
    ) -> Result<String, OrderUpdateError> {
        if !can_actor_change_status(actor, order.status) {
            return Err(OrderUpdateError::NotPermitted { role: actor, status: order.status });
        }
        if !order.status.can_transition_to(next) {
            return Err(OrderUpdateError::IllegalTransition { from: order.status, to: next });
        }
        let resp: StatusResponse = self
            .client
            .put(&format!("/api/orders/{}/status", order.id), &StatusBody { status: next })
            .await?;
        if resp.success {
            Ok(resp.message.unwrap_or_else(|| "status updated".to_string()))
        } else {
            Err(rejected(resp.message, "status update failed").into())
        }
    }

    /// Downloads the PDF receipt the backend exposes for an order.
    #[instrument(skip(self, order), fields(order_id = order.id))]
    pub async fn fetch_receipt(&self, order: &Order) -> Result<Vec<u8>, ApiError> {
        match &order.receipt_url {
            Some(url) => self.client.get_bytes(url).await,
            None => Err(ApiError::Rejected {
                status: 404,
                message: "no receipt available for this order".to_string(),
            }),
        }
    }
}
