//! Calling-shopper extractor.
//!
//! The Telegram WebApp frontend identifies the shopper with headers:
//!
//! - `x-telegram-user-id` (required for a Telegram identity)
//! - `x-telegram-first-name`, `x-telegram-last-name`, `x-telegram-username`
//!
//! A request with a Telegram ID acts as that shopper, created on first
//! sight. A request without one acts as the shared guest user.

use axum::{extract::FromRequestParts, http::request::Parts};

use drip_bloom_core::TelegramUserId;

use crate::db::UserRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::{NewUser, User};
use crate::state::AppState;

pub const TELEGRAM_USER_ID_HEADER: &str = "x-telegram-user-id";
pub const TELEGRAM_FIRST_NAME_HEADER: &str = "x-telegram-first-name";
pub const TELEGRAM_LAST_NAME_HEADER: &str = "x-telegram-last-name";
pub const TELEGRAM_USERNAME_HEADER: &str = "x-telegram-username";

/// Extractor for the user a request acts as.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     Json(user)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Header value as UTF-8 text, if present and non-empty.
fn header_text(parts: &Parts, name: &str) -> Option<String> {
    let value = parts.headers.get(name)?;
    let text = std::str::from_utf8(value.as_bytes()).ok()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Parse the Telegram ID header. `Ok(None)` when absent.
fn telegram_id(parts: &Parts) -> Result<Option<TelegramUserId>, AppError> {
    let Some(raw) = header_text(parts, TELEGRAM_USER_ID_HEADER) else {
        return Ok(None);
    };

    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .map(|id| Some(TelegramUserId::new(id)))
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {TELEGRAM_USER_ID_HEADER} header")))
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match telegram_id(parts)? {
            Some(telegram_id) => {
                let profile = NewUser {
                    telegram_id: None,
                    first_name: header_text(parts, TELEGRAM_FIRST_NAME_HEADER),
                    last_name: header_text(parts, TELEGRAM_LAST_NAME_HEADER),
                    username: header_text(parts, TELEGRAM_USERNAME_HEADER)
                        .map(|u| u.trim_start_matches('@').to_string()),
                };
                UserRepository::new(state.store())
                    .find_or_create_by_telegram_id(telegram_id, profile)?
            }
            None => state.guest().clone(),
        };

        tracing::Span::current().record("user_id", tracing::field::display(user.id));
        set_sentry_user(&user.id, user.username.as_deref());

        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/me");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).expect("request").into_parts().0
    }

    #[test]
    fn test_missing_header_is_none() {
        assert!(matches!(telegram_id(&parts(&[])), Ok(None)));
    }

    #[test]
    fn test_valid_header() {
        let id = telegram_id(&parts(&[(TELEGRAM_USER_ID_HEADER, " 123456 ")])).expect("valid");
        assert_eq!(id, Some(TelegramUserId::new(123_456)));
    }

    #[test]
    fn test_malformed_header_is_bad_request() {
        for value in ["abc", "-5", "0", "1.5"] {
            let result = telegram_id(&parts(&[(TELEGRAM_USER_ID_HEADER, value)]));
            assert!(
                matches!(result, Err(AppError::BadRequest(_))),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_header_text_trims_and_skips_empty() {
        let p = parts(&[(TELEGRAM_FIRST_NAME_HEADER, "  Anna "), (TELEGRAM_LAST_NAME_HEADER, " ")]);
        assert_eq!(header_text(&p, TELEGRAM_FIRST_NAME_HEADER).as_deref(), Some("Anna"));
        assert!(header_text(&p, TELEGRAM_LAST_NAME_HEADER).is_none());
    }
}
