//! # PharmaEase Server
//!
//! HTTP entry point for the PharmaEase dashboard.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()             RUST_LOG or the default filter           │
//! │  2. ServerConfig::load()       pharma.toml + PHARMA__* env              │
//! │  3. Store::open()              create data dir and missing files        │
//! │  4. build_router()             routes + CORS + request tracing          │
//! │  5. axum::serve()              until Ctrl+C / SIGTERM                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pharma_server::config::ServerConfig;
use pharma_server::{build_router, AppState};
use pharma_store::{Store, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    info!("Starting PharmaEase server...");

    let config = ServerConfig::load(None).context("loading configuration")?;
    let data_dir = config.data_dir();
    let addr = config.socket_addr()?;
    info!(
        %addr,
        data_dir = %data_dir.display(),
        pharmacy = %config.pharmacy.name,
        "Configuration loaded"
    );

    let store = Store::open(StoreConfig::new(&data_dir).pretty(config.storage.pretty))
        .await
        .with_context(|| format!("opening data directory {}", data_dir.display()))?;

    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - Default: `info,pharma=debug,tower_http=info`
/// - Override with the `RUST_LOG` environment variable
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pharma=debug,tower_http=info")),
        )
        .with_target(true)
        .init();
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
