//! Sweet Shop - inventory-backed storefront API.
//!
//! This binary serves the catalog and stock-mutation API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework, JSON envelope responses
//! - `PostgreSQL` catalog store (conditional stock updates) when a
//!   database URL is configured; in-memory per-item-locking store otherwise
//! - Bearer-token authentication resolved through a pluggable
//!   authenticator collaborator; role table queried once per request

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use secrecy::ExposeSecret;
use sweet_shop_core::Role;
use sweet_shop_server::auth::{Authenticator, StaticTokenAuthenticator};
use sweet_shop_server::catalog::memory::MemoryCatalog;
use sweet_shop_server::catalog::postgres::PgCatalog;
use sweet_shop_server::catalog::CatalogStore;
use sweet_shop_server::config::ServerConfig;
use sweet_shop_server::routes;
use sweet_shop_server::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
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

/// Select the catalog store from configuration.
async fn create_catalog(config: &ServerConfig) -> Arc<dyn CatalogStore> {
    match &config.database_url {
        Some(url) => {
            let catalog = PgCatalog::connect(url)
                .await
                .expect("Failed to connect to database");
            catalog.migrate().await.expect("Failed to run migrations");
            tracing::info!("PostgreSQL catalog store ready");
            Arc::new(catalog)
        }
        None => {
            tracing::warn!("no database configured, using in-memory catalog");
            Arc::new(MemoryCatalog::new())
        }
    }
}

/// Build the authenticator from the configured token tables.
fn create_authenticator(config: &ServerConfig) -> Arc<dyn Authenticator> {
    let entries = config
        .admin_tokens
        .iter()
        .map(|t| (t.subject.clone(), t.token.expose_secret().to_owned(), Role::Admin))
        .chain(config.user_tokens.iter().map(|t| {
            (t.subject.clone(), t.token.expose_secret().to_owned(), Role::User)
        }));

    Arc::new(StaticTokenAuthenticator::new(entries))
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sweet_shop_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let catalog = create_catalog(&config).await;
    let authenticator = create_authenticator(&config);

    let state = AppState::new(config.clone(), catalog, authenticator);

    // Build router
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    tracing::info!("sweet shop listening on {}", addr);

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
