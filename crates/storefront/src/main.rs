//! Drip Bloom Storefront - Telegram WebApp backend.
//!
//! This binary serves the storefront JSON API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework serving JSON to the Telegram WebApp frontend
//! - Static product catalog loaded once at startup
//! - In-memory store for shoppers, carts, favorites, and orders
//! - Telegram Bot API for seller order notifications
//!
//! All shopper data lives in process memory and is lost on restart.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use drip_bloom_storefront::app;
use drip_bloom_storefront::catalog::Catalog;
use drip_bloom_storefront::config::StorefrontConfig;
use drip_bloom_storefront::db::MemoryStore;
use drip_bloom_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Load the configured catalog, or the bundled one.
fn load_catalog(config: &StorefrontConfig) -> Catalog {
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path),
        None => Catalog::bundled(),
    }
    .expect("Failed to load catalog");

    tracing::info!(
        products = catalog.len(),
        categories = catalog.categories().len(),
        source = %config
            .catalog_path
            .as_deref()
            .map_or_else(|| "bundled".into(), |p| p.display().to_string()),
        "Catalog loaded"
    );
    catalog
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "drip_bloom_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let catalog = load_catalog(&config);

    if config.telegram.is_none() {
        tracing::warn!(
            "TELEGRAM_BOT_TOKEN or SELLER_CHAT_ID not set, order notifications are disabled"
        );
    }

    let state = AppState::new(config.clone(), Arc::new(MemoryStore::new()), catalog)
        .expect("Failed to initialize application state");
    tracing::info!(guest_user_id = %state.guest().id, "Guest user created");

    let app = app::build(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
