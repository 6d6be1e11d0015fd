//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::db::{RepositoryError, Store, UserRepository};
use crate::models::{NewUser, User};
use crate::services::{OrderNotifier, TelegramError};

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to create guest user: {0}")]
    GuestUser(#[from] RepositoryError),
    #[error("failed to create Telegram client: {0}")]
    Telegram(#[from] TelegramError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the store, the catalog, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Arc<dyn Store>,
    catalog: Catalog,
    notifier: OrderNotifier,
    guest: User,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Creates the shared guest user in `store`. The Telegram notifier is
    /// built from `config.telegram`.
    ///
    /// # Errors
    ///
    /// Returns an error if the guest user cannot be created or the Telegram
    /// client fails to build.
    pub fn new(
        config: StorefrontConfig,
        store: Arc<dyn Store>,
        catalog: Catalog,
    ) -> Result<Self, StateError> {
        let notifier = OrderNotifier::new(config.telegram.as_ref())?;
        Self::with_notifier(config, store, catalog, notifier)
    }

    /// Create a new application state with an explicit notifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the guest user cannot be created.
    pub fn with_notifier(
        config: StorefrontConfig,
        store: Arc<dyn Store>,
        catalog: Catalog,
        notifier: OrderNotifier,
    ) -> Result<Self, StateError> {
        let guest = UserRepository::new(store.as_ref()).create(NewUser::guest())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog,
                notifier,
                guest,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order notifier.
    #[must_use]
    pub fn notifier(&self) -> &OrderNotifier {
        &self.inner.notifier
    }

    /// The shared user for requests without a Telegram identity.
    #[must_use]
    pub fn guest(&self) -> &User {
        &self.inner.guest
    }
}
