//! Integration tests for the Drip Bloom storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p drip-bloom-integration-tests
//! ```
//!
//! No external services are needed: the router is driven in-process with
//! `tower::ServiceExt::oneshot`, and the Telegram Bot API is replaced by a
//! local [`MockTelegram`] server.
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Health, products, categories, caller resolution
//! - `storefront_cart` - Cart API
//! - `storefront_favorites` - Favorites API
//! - `storefront_orders` - Checkout and order lookup
//! - `telegram_notifications` - Seller notifications against the mock Bot API

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::State,
    http::{Method, Request, StatusCode, Uri, header},
};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use drip_bloom_storefront::app;
use drip_bloom_storefront::catalog::Catalog;
use drip_bloom_storefront::config::StorefrontConfig;
use drip_bloom_storefront::db::MemoryStore;
use drip_bloom_storefront::services::OrderNotifier;
use drip_bloom_storefront::state::AppState;

/// Header carrying the shopper's Telegram ID.
pub const TELEGRAM_USER_ID: &str = "x-telegram-user-id";

/// The storefront router over a fresh in-memory store.
pub struct TestApp {
    router: Router,
    state: AppState,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Bundled catalog, notifications disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(
            StorefrontConfig::default(),
            Catalog::bundled().expect("bundled catalog"),
            OrderNotifier::disabled(),
        )
    }

    /// Bundled catalog with the given notifier.
    #[must_use]
    pub fn with_notifier(notifier: OrderNotifier) -> Self {
        Self::with_parts(
            StorefrontConfig::default(),
            Catalog::bundled().expect("bundled catalog"),
            notifier,
        )
    }

    /// Fully custom app.
    #[must_use]
    pub fn with_parts(config: StorefrontConfig, catalog: Catalog, notifier: OrderNotifier) -> Self {
        let state = AppState::with_notifier(config, Arc::new(MemoryStore::new()), catalog, notifier)
            .expect("app state");
        Self {
            router: app::build(state.clone()),
            state,
        }
    }

    /// Shared state, for reaching into the store.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Send a raw request.
    pub async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Send a JSON request, optionally as a Telegram shopper.
    ///
    /// Returns the status and the parsed body (`Value::Null` for an empty
    /// body, a string for non-JSON text).
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        telegram_id: Option<i64>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = telegram_id {
            builder = builder.header(TELEGRAM_USER_ID, id.to_string());
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.send(builder.body(body).expect("request")).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    pub async fn get(&self, uri: &str, telegram_id: Option<i64>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None, telegram_id).await
    }

    pub async fn post(&self, uri: &str, body: Value, telegram_id: Option<i64>) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(body), telegram_id).await
    }

    pub async fn patch(&self, uri: &str, body: Value, telegram_id: Option<i64>) -> (StatusCode, Value) {
        self.call(Method::PATCH, uri, Some(body), telegram_id).await
    }

    pub async fn delete(&self, uri: &str, telegram_id: Option<i64>) -> (StatusCode, Value) {
        self.call(Method::DELETE, uri, None, telegram_id).await
    }
}

/// Read a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
}

// =============================================================================
// Mock Telegram Bot API
// =============================================================================

/// A request received by the mock Bot API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

/// Local stand-in for `api.telegram.org`.
#[derive(Clone)]
pub struct MockTelegram {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: StatusCode,
    response: Value,
    addr: SocketAddr,
}

impl MockTelegram {
    /// A mock that accepts every message.
    pub async fn ok() -> Self {
        Self::start(
            StatusCode::OK,
            serde_json::json!({ "ok": true, "result": { "message_id": 77 } }),
        )
        .await
    }

    /// Start a mock answering every call with `status` and `response`.
    pub async fn start(status: StatusCode, response: Value) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock");
        let addr = listener.local_addr().expect("mock addr");

        let mock = Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            status,
            response,
            addr,
        };

        let router = Router::new()
            .fallback(record_request)
            .with_state(mock.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock server");
        });

        mock
    }

    /// Base URL to use as `TELEGRAM_API_BASE`.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("mock url")
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mock lock").clone()
    }

    /// Wait until at least `count` requests arrived.
    pub async fn wait_for(&self, count: usize) -> Vec<RecordedRequest> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let requests = self.requests();
            if requests.len() >= count || tokio::time::Instant::now() >= deadline {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

async fn record_request(
    State(mock): State<MockTelegram>,
    uri: Uri,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.requests
        .lock()
        .expect("mock lock")
        .push(RecordedRequest {
            path: uri.path().to_string(),
            body,
        });
    (mock.status, Json(mock.response.clone()))
}

/// An address nothing listens on.
pub async fn unreachable_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("url")
}
