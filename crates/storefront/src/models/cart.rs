//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use drip_bloom_core::{CartItemId, ProductId, Quantity, UserId};

use super::Product;

/// One cart row: a (user, product, size) selection with a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub size: String,
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
}

/// Data for adding a product to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub size: String,
    pub quantity: Quantity,
}

/// A cart row joined with its catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Product,
}
