//! Caseflow Server — real-time presence backend for the visa case desk.
//!
//! Main entry point that wires the crates together and runs until Ctrl-C.

use tracing_subscriber::{EnvFilter, fmt};

use caseflow_core::config::AppConfig;
use caseflow_core::error::AppError;
use caseflow_realtime::PresenceEngine;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CASEFLOW_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Caseflow v{}", env!("CARGO_PKG_VERSION"));

    // The engine owns the registry and the sweeper. Connection events are
    // fed in by the transport layer, which attaches to the engine's
    // pub/sub topics for delivery back to clients.
    let engine = PresenceEngine::new(config.realtime.clone());

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown signal: {}", e)))?;

    tracing::info!("Shutdown signal received");
    engine.shutdown().await?;

    Ok(())
}
