//! Instrumented Cache - HTTP server
//!
//! Exposes the instrumented cache, its call history and the expiring page
//! cache over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use instrumented_cache::api::{create_router, AppState};
use instrumented_cache::config::{Config, StoreBackend};
use instrumented_cache::store::{self, MemoryStore, SharedStore};
use instrumented_cache::tasks::spawn_cleanup_task;

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect to the configured store (starting the expiry sweep for the
///    memory store)
/// 4. Build the cache facades, flushing the store if configured
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "instrumented_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Instrumented Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, page_cache_ttl={}s, port={}, flush_on_start={}",
        config.store_backend, config.page_cache_ttl, config.server_port, config.flush_on_start
    );

    let (store, cleanup_handle): (SharedStore, Option<JoinHandle<()>>) =
        match config.store_backend {
            StoreBackend::Memory => {
                let memory = Arc::new(MemoryStore::new());
                let handle = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
                info!("Memory store initialized with background expiry sweep");
                (memory as SharedStore, Some(handle))
            }
            StoreBackend::Redis => (store::connect(&config).await?, None),
        };

    let state = AppState::from_config(store, &config).await?;
    info!("Cache facades initialized");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the expiry sweep if one is running.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Expiry sweep task aborted");
    }
}
