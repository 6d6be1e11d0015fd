//! Router assembly.
//!
//! Shared by the server binary and the integration tests. Sentry layers are
//! added by the binary on top of this router.

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, Method, header},
    middleware,
    routing::get,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::current_user::{
    TELEGRAM_FIRST_NAME_HEADER, TELEGRAM_LAST_NAME_HEADER, TELEGRAM_USER_ID_HEADER,
    TELEGRAM_USERNAME_HEADER,
};
use crate::middleware::request_id::REQUEST_ID_HEADER;
use crate::middleware::request_id_middleware;
use crate::routes;
use crate::state::AppState;

/// How long browsers may cache a CORS preflight.
const CORS_MAX_AGE: Duration = Duration::from_secs(600);

/// Build the storefront router.
pub fn build(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        );

    if let Some(cors) = cors_layer(&state) {
        app = app.layer(cors);
    }

    app.with_state(state)
}

/// CORS for the Telegram WebApp frontend, if any origins are configured.
fn cors_layer(state: &AppState) -> Option<CorsLayer> {
    let origins = &state.config().allowed_origins;
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins.iter().cloned()))
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([
                header::CONTENT_TYPE,
                HeaderName::from_static(REQUEST_ID_HEADER),
                HeaderName::from_static(TELEGRAM_USER_ID_HEADER),
                HeaderName::from_static(TELEGRAM_FIRST_NAME_HEADER),
                HeaderName::from_static(TELEGRAM_LAST_NAME_HEADER),
                HeaderName::from_static(TELEGRAM_USERNAME_HEADER),
            ])
            .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
            .max_age(CORS_MAX_AGE),
    )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
