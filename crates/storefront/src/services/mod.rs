//! Outbound services for the storefront.
//!
//! # Services
//!
//! - `telegram` - Telegram Bot API client
//! - `notifications` - Seller notifications for new orders

pub mod notifications;
pub mod telegram;

pub use notifications::{CustomerInfo, OrderNotifier, format_order_message};
pub use telegram::{TelegramClient, TelegramError};
