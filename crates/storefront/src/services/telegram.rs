//! Telegram Bot API client.
//!
//! Only `sendMessage` is needed: order notifications go to one fixed chat.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::TelegramConfig;

/// Upper bound for one Bot API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed.
    #[error("Telegram request failed: {0}")]
    Request(String),

    /// Bot API rejected the call.
    #[error("Telegram API error ({status}): {description}")]
    Api { status: u16, description: String },

    /// Failed to parse response.
    #[error("Telegram response error: {0}")]
    Response(String),
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    result: Option<SentMessage>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Bot API client bound to one destination chat.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    bot_token: SecretString,
    chat_id: String,
    api_base: Url,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base.as_str())
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Create a new Telegram client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TelegramError::Request(e.to_string()))?;

        Ok(Self {
            client,
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            api_base: config.api_base.clone(),
        })
    }

    /// Send an HTML-formatted message to the configured chat.
    ///
    /// Returns the Telegram message ID.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the Bot API reports a failure.
    #[instrument(skip(self, text), fields(chat_id = %self.chat_id))]
    pub async fn send_message(&self, text: &str) -> Result<i64, TelegramError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.api_base.as_str().trim_end_matches('/'),
            self.bot_token.expose_secret()
        );

        let response = self
            .client
            .post(url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
                parse_mode: "HTML",
            })
            .send()
            .await
            // The URL carries the bot token
            .map_err(|e| TelegramError::Request(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TelegramError::Response(e.without_url().to_string()))?;
        let result: Option<ApiResponse> = serde_json::from_str(&body).ok();

        match result {
            Some(ApiResponse {
                ok: true,
                result: Some(sent),
                ..
            }) if status.is_success() => {
                debug!(message_id = sent.message_id, "Message sent to Telegram");
                Ok(sent.message_id)
            }
            Some(ApiResponse {
                ok: true,
                result: None,
                ..
            }) if status.is_success() => Err(TelegramError::Response(
                "missing result in sendMessage response".to_string(),
            )),
            Some(api) => Err(TelegramError::Api {
                status: status.as_u16(),
                description: api
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string()),
            }),
            None if status.is_success() => Err(TelegramError::Response(format!(
                "unparseable sendMessage response: {body}"
            ))),
            None => Err(TelegramError::Api {
                status: status.as_u16(),
                description: status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let client = TelegramClient::new(&TelegramConfig {
            bot_token: SecretString::from("123456:super-secret"),
            chat_id: "42".to_string(),
            api_base: Url::parse("https://api.telegram.org").expect("url"),
        })
        .expect("client");

        let debug = format!("{client:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("\"42\""));
    }

    #[test]
    fn test_send_message_payload() {
        let payload = serde_json::to_value(SendMessage {
            chat_id: "42",
            text: "<b>hi</b>",
            parse_mode: "HTML",
        })
        .expect("serialize");

        assert_eq!(
            payload,
            serde_json::json!({ "chat_id": "42", "text": "<b>hi</b>", "parse_mode": "HTML" })
        );
    }
}
