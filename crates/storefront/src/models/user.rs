//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use drip_bloom_core::{TelegramUserId, UserId};

/// A storefront shopper.
///
/// Shoppers arriving through the Telegram WebApp are keyed by their
/// Telegram ID. Requests without a Telegram identity share the guest user,
/// which has no `telegram_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Telegram user ID, if the shopper came through Telegram.
    pub telegram_id: Option<TelegramUserId>,
    /// Telegram first name.
    pub first_name: Option<String>,
    /// Telegram last name.
    pub last_name: Option<String>,
    /// Telegram `@username` without the `@`.
    pub username: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub telegram_id: Option<TelegramUserId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl NewUser {
    /// The shared guest user for requests without a Telegram identity.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            first_name: Some("Guest".to_string()),
            ..Self::default()
        }
    }

    /// A Telegram shopper with no profile details yet.
    #[must_use]
    pub fn telegram(telegram_id: TelegramUserId) -> Self {
        Self {
            telegram_id: Some(telegram_id),
            ..Self::default()
        }
    }
}
