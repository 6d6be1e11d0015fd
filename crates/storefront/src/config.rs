//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CATALOG_PATH` - Catalog JSON file (default: bundled catalog)
//! - `STOREFRONT_ALLOWED_ORIGINS` - Comma-separated CORS origins for the WebApp frontend
//! - `TELEGRAM_BOT_TOKEN` - Bot API token (`<bot id>:<secret>`)
//! - `SELLER_CHAT_ID` - Chat that receives order notifications
//! - `TELEGRAM_API_BASE` - Bot API base URL (default: <https://api.telegram.org>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//!
//! Order notifications need both `TELEGRAM_BOT_TOKEN` and `SELLER_CHAT_ID`.
//! When either is missing the storefront still starts; orders are accepted
//! and the notification step is skipped.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use axum::http::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Default Telegram Bot API endpoint.
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog file; `None` uses the catalog bundled into the binary
    pub catalog_path: Option<PathBuf>,
    /// Origins allowed to call the API cross-origin
    pub allowed_origins: Vec<HeaderValue>,
    /// Telegram order notifications (disabled when `None`)
    pub telegram: Option<TelegramConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Telegram Bot API configuration for seller notifications.
///
/// Implements `Debug` manually to redact the bot token.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token, embedded in the request path
    pub bot_token: SecretString,
    /// Seller chat ID (numeric ID or `@channel` username)
    pub chat_id: String,
    /// Bot API base URL
    pub api_base: Url,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            catalog_path: None,
            allowed_origins: Vec::new(),
            telegram: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid. Missing
    /// Telegram variables are not an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let catalog_path = get_optional_env("STOREFRONT_CATALOG_PATH").map(PathBuf::from);
        let allowed_origins = get_optional_env("STOREFRONT_ALLOWED_ORIGINS")
            .map(|raw| parse_origins(&raw, "STOREFRONT_ALLOWED_ORIGINS"))
            .transpose()?
            .unwrap_or_default();

        let telegram = TelegramConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            catalog_path,
            allowed_origins,
            telegram,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl TelegramConfig {
    /// Load Telegram configuration from environment.
    ///
    /// Returns `Ok(None)` if the token or chat ID is not set (notifications
    /// disabled).
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let (Some(token), Some(chat_id)) = (
            get_optional_env("TELEGRAM_BOT_TOKEN"),
            get_optional_env("SELLER_CHAT_ID"),
        ) else {
            return Ok(None);
        };

        let bot_token = SecretString::from(token);
        validate_bot_token(&bot_token, "TELEGRAM_BOT_TOKEN")?;
        validate_chat_id(&chat_id, "SELLER_CHAT_ID")?;

        let api_base = parse_url(
            &get_env_or_default("TELEGRAM_API_BASE", DEFAULT_TELEGRAM_API_BASE),
            "TELEGRAM_API_BASE",
        )?;

        Ok(Some(Self {
            bot_token,
            chat_id,
            api_base,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an absolute http(s) URL.
fn parse_url(raw: &str, var_name: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse a comma-separated list of CORS origins.
fn parse_origins(raw: &str, var_name: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| {
                ConfigError::InvalidEnvVar(
                    var_name.to_string(),
                    format!("invalid origin '{origin}'"),
                )
            })
        })
        .collect()
}

/// Validate the `<bot id>:<secret>` shape of a Telegram bot token.
///
/// Catches placeholders like `your-bot-token` at startup instead of on the
/// first order.
fn validate_bot_token(token: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = token.expose_secret();
    let Some((bot_id, secret)) = value.split_once(':') else {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "expected '<bot id>:<secret>'".to_string(),
        ));
    };

    if bot_id.is_empty() || !bot_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "bot id must be numeric".to_string(),
        ));
    }

    if secret.is_empty()
        || !secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "secret part must be non-empty and URL-safe".to_string(),
        ));
    }

    Ok(())
}

/// Validate a chat ID: a (possibly negative) integer or an `@username`.
fn validate_chat_id(chat_id: &str, var_name: &str) -> Result<(), ConfigError> {
    let is_numeric = chat_id.parse::<i64>().is_ok();
    let is_username = chat_id.len() > 1 && chat_id.starts_with('@');
    if is_numeric || is_username {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "expected a numeric chat id or @username".to_string(),
        ))
    }
}
