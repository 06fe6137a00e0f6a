//! HTTP server initialization and runtime setup.
//!
//! Handles the store connection, state wiring, and Axum server lifecycle.

use crate::config::Config;
use crate::infrastructure::store::{KeyValueStore, MemoryStore, RedisStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::SystemClock;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Opens the configured store.
///
/// With a Redis URL the connection must succeed: running on a private
/// in-memory store instead would silently split rotation state between
/// instances. Without one, the in-memory store is used.
///
/// # Errors
///
/// Returns an error if Redis is configured but cannot be reached.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    match &config.redis_url {
        Some(redis_url) => {
            let redis = RedisStore::connect(redis_url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Store: Redis connected");
            Ok(Arc::new(redis))
        }
        None => {
            tracing::warn!("REDIS_URL not set; using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Key-value store (Redis, or in-memory fallback)
/// - Application services
/// - Axum HTTP server, until Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Redis is configured but unreachable
/// - The url allow-list does not compile
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;

    let state = AppState::new(
        store,
        &config.settings,
        &config.admin_token,
        Arc::new(SystemClock),
    )?;

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
