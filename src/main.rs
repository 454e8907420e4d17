//! imcache server
//!
//! Serves a shared cache over HTTP and applies remote invalidations.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imcache::api::create_router;
use imcache::{spawn_cleanup_task, spawn_invalidation_listener, AppState, Config, SharedCache};

/// Main entry point for the imcache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache with a WebSocket transport
/// 4. Start the expiry sweep and the remote invalidation listener
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting imcache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl_ms={}, cascade_on_expiry={}, port={}, cleanup_interval={}s",
        config.default_ttl_ms, config.cascade_on_expiry, config.server_port, config.cleanup_interval
    );

    let state = AppState::from_config(&config);
    info!("Cache initialized");

    let cleanup_handle = spawn_cleanup_task(state.cache.clone(), config.cleanup_interval);
    let listener_handle = spawn_invalidation_listener(state.cache.clone());
    info!("Background tasks started");

    let cache = state.cache.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(
            cache,
            vec![cleanup_handle, listener_handle],
        ))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown, aborts background tasks and closes remote channels.
async fn shutdown_signal(cache: SharedCache, tasks: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for task in tasks {
        task.abort();
    }
    warn!("Background tasks aborted");

    cache.write().await.close_channels();
    info!("Remote channels closed");
}
