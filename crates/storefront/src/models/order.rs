//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use drip_bloom_core::{OrderId, OrderStatus, Price, ProductId, Quantity, UserId};

/// An order: an immutable snapshot of the items and totals at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    /// Goods total as submitted at checkout.
    pub total_amount: Price,
    pub shipping_amount: Price,
    pub status: OrderStatus,
    /// Order reference from the Telegram side, if the client sent one.
    pub telegram_order_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Goods total plus shipping, or `None` if the sum overflows.
    #[must_use]
    pub fn grand_total(&self) -> Option<Price> {
        self.total_amount.checked_add(self.shipping_amount)
    }
}

/// One line of an order snapshot.
///
/// Name and price are copied at checkout so later catalog changes do not
/// rewrite past orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub size: String,
    pub quantity: Quantity,
    pub price: Price,
}

/// Data for creating an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_amount: Price,
    pub shipping_amount: Price,
    pub telegram_order_id: Option<String>,
}
