//! Seller notifications for new orders.
//!
//! Each placed order is posted to the seller's Telegram chat. Delivery is
//! best-effort: it runs on its own task after the order is stored, and a
//! failure is logged without touching the order.

use std::fmt::Write as _;

use tokio::task::JoinHandle;

use drip_bloom_core::TelegramUserId;

use super::telegram::{TelegramClient, TelegramError};
use crate::config::TelegramConfig;
use crate::models::{Order, User};

/// Who placed an order, as shown to the seller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInfo {
    pub telegram_id: TelegramUserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl CustomerInfo {
    /// Customer details for a user, if they came through Telegram.
    #[must_use]
    pub fn from_user(user: &User) -> Option<Self> {
        Some(Self {
            telegram_id: user.telegram_id?,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
        })
    }
}

/// Escape text for Telegram's HTML parse mode.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render the seller message for an order.
#[must_use]
pub fn format_order_message(order: &Order, customer: Option<&CustomerInfo>) -> String {
    let mut message = format!("🛍️ <b>Новый заказ #{}</b>\n\n", escape_html(&order.id.to_string()));

    // Writing to a String cannot fail
    if let Some(customer) = customer {
        message.push_str("👤 <b>Покупатель:</b>\n");
        let _ = writeln!(message, "• ID: {}", customer.telegram_id);

        let name = [customer.first_name.as_deref(), customer.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .map(escape_html)
            .collect::<Vec<_>>()
            .join(" ");
        if !name.is_empty() {
            let _ = writeln!(message, "• Имя: {name}");
        }
        if let Some(username) = customer.username.as_deref().filter(|u| !u.is_empty()) {
            let _ = writeln!(message, "• Username: @{}", escape_html(username));
        }
        message.push('\n');
    }

    message.push_str("📦 <b>Товары:</b>\n");
    for (index, item) in order.items.iter().enumerate() {
        let _ = writeln!(message, "{}. <b>{}</b>", index + 1, escape_html(&item.product_name));
        let _ = writeln!(message, "   Размер: {}", escape_html(&item.size));
        let _ = writeln!(message, "   Количество: {}", item.quantity);
        let _ = write!(message, "   Цена: {} ₽\n\n", item.price);
    }

    message.push_str("💰 <b>Итого:</b>\n");
    let _ = writeln!(message, "• Товары: {} ₽", order.total_amount);
    let _ = writeln!(message, "• Доставка: {} ₽", order.shipping_amount);
    if let Some(grand_total) = order.grand_total() {
        let _ = writeln!(
            message,
            "• <b>Общая сумма: {:.2} ₽</b>",
            grand_total.amount()
        );
    }
    message.push('\n');

    message.push_str("📞 Свяжитесь с покупателем для подтверждения заказа!");
    message
}

/// Dispatches order notifications to the seller chat.
///
/// When Telegram is not configured, notifications are skipped.
#[derive(Debug, Clone, Default)]
pub struct OrderNotifier {
    telegram: Option<TelegramClient>,
}

impl OrderNotifier {
    /// Create a notifier from the Telegram configuration, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: Option<&TelegramConfig>) -> Result<Self, TelegramError> {
        Ok(Self {
            telegram: config.map(TelegramClient::new).transpose()?,
        })
    }

    /// A notifier that never sends anything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { telegram: None }
    }

    /// Whether notifications will be sent.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.telegram.is_some()
    }

    /// Send the seller message for `order` in the background.
    ///
    /// Returns the task handle, or `None` when notifications are disabled.
    /// Callers are free to drop the handle.
    pub fn notify(&self, order: &Order, customer: Option<&CustomerInfo>) -> Option<JoinHandle<()>> {
        let Some(telegram) = self.telegram.clone() else {
            tracing::debug!(order_id = %order.id, "Telegram not configured, skipping order notification");
            return None;
        };

        let order_id = order.id;
        let text = format_order_message(order, customer);

        Some(tokio::spawn(async move {
            match telegram.send_message(&text).await {
                Ok(message_id) => {
                    tracing::info!(%order_id, message_id, "Order notification sent");
                }
                Err(e) => {
                    tracing::error!(%order_id, error = %e, "Order notification failed");
                }
            }
        }))
    }
}
