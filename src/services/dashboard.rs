//! Dashboard statistics
//!
//! The backend has no stats endpoint; the dashboard derives its numbers
//! client-side from the product, order and user listings, fetched in
//! parallel.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use super::orders::OrdersService;
use super::products::ProductsService;
use super::users::UsersService;
use super::{ApiClient, ApiError};
use crate::domain::aggregates::order::Order;
use crate::domain::aggregates::product::ProductSnapshot;
use crate::session::User;

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardStats {
    pub today_sales: Decimal,
    pub total_products: usize,
    pub total_orders: usize,
    pub total_users: usize,
    pub today_orders_count: usize,
    pub average_order_value: Decimal,
}

/// Pure aggregation over already-fetched listings.
pub fn compute_stats(
    products: &[ProductSnapshot],
    orders: &[Order],
    users: &[User],
    today: NaiveDate,
) -> DashboardStats {
    let today_orders: Vec<&Order> = orders
        .iter()
        .filter(|o| o.created_at.is_some_and(|t| t.date_naive() == today))
        .collect();
    let today_sales: Decimal = today_orders.iter().map(|o| o.total_amount).sum();
    let grand_total: Decimal = orders.iter().map(|o| o.total_amount).sum();
    let average_order_value = if orders.is_empty() {
        Decimal::ZERO
    } else {
        grand_total / Decimal::from(orders.len() as u64)
    };
    DashboardStats {
        today_sales,
        total_products: products.len(),
        total_orders: orders.len(),
        total_users: users.len(),
        today_orders_count: today_orders.len(),
        average_order_value,
    }
}

pub struct DashboardService {
    products: ProductsService,
    orders: OrdersService,
    users: UsersService,
}

impl DashboardService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            products: ProductsService::new(client.clone()),
            orders: OrdersService::new(client.clone()),
            users: UsersService::new(client),
        }
    }

    /// Gathers the three backing lists in parallel and aggregates them.
    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        let (products, orders, users) =
            tokio::join!(self.products.list(), self.orders.all_orders(), self.users.list());
        Ok(compute_stats(&products?, &orders?, &users?, Utc::now().date_naive()))
    }
}
