//! Cart repository scoped to one shopper.

use drip_bloom_core::{CartItemId, ProductId, Quantity, UserId};

use super::{RepositoryError, Store};
use crate::catalog::Catalog;
use crate::models::{CartItem, CartLine, NewCartItem};

/// Cart operations for a single user.
///
/// Rows belonging to other users are invisible: updating or removing them
/// behaves as if they did not exist.
pub struct CartRepository<'a> {
    store: &'a dyn Store,
    catalog: &'a Catalog,
    user: UserId,
}

impl<'a> CartRepository<'a> {
    /// Create a cart repository for `user`.
    #[must_use]
    pub const fn new(store: &'a dyn Store, catalog: &'a Catalog, user: UserId) -> Self {
        Self {
            store,
            catalog,
            user,
        }
    }

    /// Cart rows joined with their products.
    ///
    /// Rows whose product is no longer in the catalog are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn items(&self) -> Result<Vec<CartLine>, RepositoryError> {
        Ok(self
            .store
            .cart_items(self.user)?
            .into_iter()
            .filter_map(|item| {
                let product = self.catalog.product(&item.product_id)?.clone();
                Some(CartLine { item, product })
            })
            .collect())
    }

    /// Total number of units in the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self
            .store
            .cart_items(self.user)?
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum())
    }

    /// Add units of a product in a size, merging with an existing row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn add(
        &self,
        product_id: ProductId,
        size: String,
        quantity: Quantity,
    ) -> Result<CartItem, RepositoryError> {
        let item = self.store.upsert_cart_item(NewCartItem {
            user_id: self.user,
            product_id,
            size,
            quantity,
        })?;

        tracing::debug!(
            user_id = %self.user,
            cart_item_id = %item.id,
            quantity = %item.quantity,
            "Added to cart"
        );
        Ok(item)
    }

    /// Set a row's quantity. Returns `None` if the row is not in this cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn update(
        &self,
        id: CartItemId,
        quantity: Quantity,
    ) -> Result<Option<CartItem>, RepositoryError> {
        self.store.update_cart_item(self.user, id, quantity)
    }

    /// Remove a row. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn remove(&self, id: CartItemId) -> Result<bool, RepositoryError> {
        self.store.remove_cart_item(self.user, id)
    }

    /// Empty the cart. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn clear(&self) -> Result<usize, RepositoryError> {
        self.store.clear_cart(self.user)
    }
}
