//! User repository.
//!
//! Users are created on demand: the guest user once at startup, Telegram
//! shoppers the first time a request carries their Telegram ID.

use drip_bloom_core::{TelegramUserId, UserId};

use super::{RepositoryError, Store};
use crate::models::{NewUser, User};

/// Repository for user operations.
pub struct UserRepository<'a> {
    store: &'a dyn Store,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.store.user(id)
    }

    /// Get a user by their Telegram ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn get_by_telegram_id(
        &self,
        telegram_id: TelegramUserId,
    ) -> Result<Option<User>, RepositoryError> {
        self.store.user_by_telegram_id(telegram_id)
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn create(&self, new: NewUser) -> Result<User, RepositoryError> {
        let user = self.store.create_user(new)?;
        tracing::debug!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Resolve a Telegram shopper, creating them on first sight.
    ///
    /// Profile fields are only used when the user is created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn find_or_create_by_telegram_id(
        &self,
        telegram_id: TelegramUserId,
        profile: NewUser,
    ) -> Result<User, RepositoryError> {
        if let Some(user) = self.get_by_telegram_id(telegram_id)? {
            return Ok(user);
        }

        // create_user resolves to the existing row if another request won the race
        self.create(NewUser {
            telegram_id: Some(telegram_id),
            ..profile
        })
    }
}
