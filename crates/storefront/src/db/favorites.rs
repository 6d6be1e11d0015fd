//! Favorites repository scoped to one shopper.

use drip_bloom_core::{ProductId, UserId};

use super::{RepositoryError, Store};
use crate::catalog::Catalog;
use crate::models::{Favorite, FavoriteEntry};

/// Favorite operations for a single user.
pub struct FavoriteRepository<'a> {
    store: &'a dyn Store,
    catalog: &'a Catalog,
    user: UserId,
}

impl<'a> FavoriteRepository<'a> {
    /// Create a favorites repository for `user`.
    #[must_use]
    pub const fn new(store: &'a dyn Store, catalog: &'a Catalog, user: UserId) -> Self {
        Self {
            store,
            catalog,
            user,
        }
    }

    /// Favorites joined with their products, skipping retired products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn list(&self) -> Result<Vec<FavoriteEntry>, RepositoryError> {
        Ok(self
            .store
            .favorites(self.user)?
            .into_iter()
            .filter_map(|favorite| {
                let product = self.catalog.product(&favorite.product_id)?.clone();
                Some(FavoriteEntry { favorite, product })
            })
            .collect())
    }

    /// Number of favorites.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.store.favorites(self.user)?.len())
    }

    /// Add a product to favorites. Adding it again returns the same row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn add(&self, product_id: &ProductId) -> Result<Favorite, RepositoryError> {
        self.store.upsert_favorite(self.user, product_id)
    }

    /// Remove a product from favorites. Returns whether it was a favorite.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn remove(&self, product_id: &ProductId) -> Result<bool, RepositoryError> {
        self.store.remove_favorite(self.user, product_id)
    }

    /// Flip a product's favorite state. Returns `true` if it is now a favorite.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn toggle(&self, product_id: &ProductId) -> Result<bool, RepositoryError> {
        let favorite = self.store.toggle_favorite(self.user, product_id)?;
        tracing::debug!(user_id = %self.user, product_id = %product_id, favorite, "Toggled favorite");
        Ok(favorite)
    }
}
