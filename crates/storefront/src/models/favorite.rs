//! Favorite domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use drip_bloom_core::{FavoriteId, ProductId, UserId};

use super::Product;

/// A (user, product) bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
}

/// A favorite joined with its catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteEntry {
    #[serde(flatten)]
    pub favorite: Favorite,
    pub product: Product,
}
