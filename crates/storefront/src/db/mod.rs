//! Storage for storefront shopper data.
//!
//! Stores per-user state only (the catalog is static and lives in
//! [`crate::catalog`]):
//!
//! ## Collections
//!
//! - `users` - Shoppers, unique per Telegram ID
//! - `cart_items` - Cart rows, unique per (user, product, size)
//! - `favorites` - Favorite products, unique per (user, product)
//! - `orders` - Order snapshots
//!
//! All data is held in process memory and lost on restart.
//!
//! # Access
//!
//! Handlers never talk to a [`Store`] directly for shopper data. They build
//! a repository scoped to the calling user, which can only see and change
//! that user's rows:
//!
//! ```rust,ignore
//! let cart = CartRepository::new(state.store(), state.catalog(), user.id);
//! let lines = cart.items()?;
//! ```

pub mod cart;
pub mod favorites;
pub mod memory;
pub mod orders;
pub mod users;

pub use cart::CartRepository;
pub use favorites::FavoriteRepository;
pub use memory::MemoryStore;
pub use orders::OrderRepository;
pub use users::UserRepository;

use drip_bloom_core::{CartItemId, OrderId, ProductId, Quantity, TelegramUserId, UserId};
use thiserror::Error;

use crate::models::{CartItem, Favorite, NewCartItem, NewOrder, NewUser, Order, User};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying storage is unusable.
    #[error("storage error: {0}")]
    Storage(String),

    /// Data in the store violates an invariant.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Keyed collections backing the storefront.
///
/// Every method is a single atomic operation: upserts check for an existing
/// row and insert within the same critical section, so concurrent callers
/// cannot create duplicate rows for one uniqueness key.
///
/// Methods taking a `user` only touch rows owned by that user. A row that
/// exists but belongs to someone else is treated as absent.
pub trait Store: Send + Sync {
    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Get a user by Telegram ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn user_by_telegram_id(
        &self,
        telegram_id: TelegramUserId,
    ) -> Result<Option<User>, RepositoryError>;

    /// Create a user.
    ///
    /// A `telegram_id` that already belongs to a user resolves to that user
    /// instead of creating a second one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn create_user(&self, new: NewUser) -> Result<User, RepositoryError>;

    /// Cart rows for a user, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn cart_items(&self, user: UserId) -> Result<Vec<CartItem>, RepositoryError>;

    /// Add to a cart, merging with the existing (user, product, size) row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn upsert_cart_item(&self, item: NewCartItem) -> Result<CartItem, RepositoryError>;

    /// Set the quantity of a cart row. Returns `None` if the row is missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn update_cart_item(
        &self,
        user: UserId,
        id: CartItemId,
        quantity: Quantity,
    ) -> Result<Option<CartItem>, RepositoryError>;

    /// Remove a cart row. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn remove_cart_item(&self, user: UserId, id: CartItemId) -> Result<bool, RepositoryError>;

    /// Remove every cart row for a user. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn clear_cart(&self, user: UserId) -> Result<usize, RepositoryError>;

    /// Favorites for a user, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn favorites(&self, user: UserId) -> Result<Vec<Favorite>, RepositoryError>;

    /// Add a favorite, returning the existing row if already present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn upsert_favorite(
        &self,
        user: UserId,
        product: &ProductId,
    ) -> Result<Favorite, RepositoryError>;

    /// Remove a favorite. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn remove_favorite(&self, user: UserId, product: &ProductId) -> Result<bool, RepositoryError>;

    /// Flip favorite membership. Returns `true` if the product is now a
    /// favorite.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn toggle_favorite(&self, user: UserId, product: &ProductId) -> Result<bool, RepositoryError>;

    /// Persist an order and clear the ordering user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn create_order(&self, order: NewOrder) -> Result<Order, RepositoryError>;

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    fn order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;
}
