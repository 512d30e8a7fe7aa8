//! Bill Split API Server Binary
//!
//! This binary starts the HTTP API over the account type registry, the
//! feature gate and the split allocation engine.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin split-api
//!
//! # Run with environment variables
//! SPLIT_PORT=9090 SPLIT_FEATURE_FLAGS_PATH=flags.json cargo run --bin split-api
//! ```
//!
//! # Environment Variables
//!
//! * `SPLIT_HOST` - Server host (default: 0.0.0.0)
//! * `SPLIT_PORT` - Server port (default: 8080)
//! * `SPLIT_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `SPLIT_FEATURE_FLAGS_PATH` - JSON flag document (default: all gated operations off)
//! * `SPLIT_UNKNOWN_FEATURE_DEFAULT` - `true`/`false` answer for undefined flags
//!   (default: undefined flags are an error)
//!
//! `RUST_LOG` takes precedence over `SPLIT_LOG_LEVEL`.

use interface_api::{config::ApiConfig, create_router, default_flags, AppState};
use domain_feature::{FeatureFlagStore, InMemoryFlagStore, JsonFileFlagStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The configured flag document cannot be loaded
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        flags = ?config.feature_flags_path,
        "Starting Bill Split API Server"
    );

    let flag_store = create_flag_store(&config);
    let state = AppState::new(config.clone(), flag_store);

    // Fail fast on a missing or malformed flag document.
    let snapshot = state.flags.snapshot().await?;
    tracing::info!(flags = snapshot.len(), account_types = state.registry.len(), "Domain ready");

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

fn create_flag_store(config: &ApiConfig) -> Arc<dyn FeatureFlagStore> {
    match &config.feature_flags_path {
        Some(path) => Arc::new(JsonFileFlagStore::new(path)),
        None => {
            tracing::warn!("No feature flag file configured; all gated operations are off");
            Arc::new(InMemoryFlagStore::new(default_flags()))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
