//! Virtual patient API - Web Server Entry Point
//!
//! Connects to MongoDB, then serves the virtual patient API until SIGINT/SIGTERM.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use vpatient_api::{
    api::create_router, config::Config, logging, models::VirtualPatient, seed, state::AppState,
};
use vpatient_store::{DocumentStore, MongoDocumentStore, OperationContext};

#[derive(Debug, Parser)]
#[command(name = "ambulance-api-service", version, about = "Virtual patient API service")]
struct Cli {
    /// Load environment variables from this file before reading configuration
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Override the listen port (AMBULANCE_API_PORT)
    #[arg(long, short)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.env_file {
        dotenvy::from_path(path)
            .with_context(|| format!("Failed to load env file {}", path.display()))?;
    }

    // Load configuration first to get logging settings
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = config.logging.deployment_environment,
        "Starting virtual patient API"
    );

    let addr = config
        .socket_addr()
        .context("Failed to determine socket address")?;

    let store = MongoDocumentStore::<VirtualPatient>::connect(config.mongodb.store_config())
        .await
        .context("Failed to connect to MongoDB")?;
    let store = Arc::new(store);

    if config.mongodb.seed {
        if store.created_collection() {
            if let Err(e) = seed::seed_patients(store.as_ref(), &OperationContext::new()).await {
                let _ = store.disconnect().await;
                return Err(anyhow::anyhow!(
                    "Failed to seed sample virtual patients: {}",
                    e.diagnostic()
                ));
            }
        } else {
            tracing::info!(
                collection = store.collection_name(),
                "Collection already exists, skipping sample data"
            );
        }
    }

    tracing::info!(
        listen_addr = %addr,
        collection = store.collection_name(),
        "Configuration loaded"
    );

    let state = AppState::new(config, store.clone());
    let app = create_router(state);

    let result = serve(addr, app).await;

    // The store is released on every exit path, including a failed bind.
    if let Err(e) = store.disconnect().await {
        tracing::warn!(error = %e.diagnostic(), "Failed to disconnect from MongoDB");
    }

    match result {
        Ok(()) => {
            tracing::info!("Server shutdown complete");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Server terminated unexpectedly");
            Err(e)
        }
    }
}

async fn serve(addr: std::net::SocketAddr, app: axum::Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener on {addr}"))?;

    tracing::info!("Virtual patient API listening on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API endpoint: http://{}/api/virtual-patient", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
/// Docker sends SIGTERM, while Ctrl+C sends SIGINT
#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm =
        signal(SignalKind::terminate()).expect("Failed to install SIGTERM signal handler");
    let sigint = tokio::signal::ctrl_c();

    tokio::select! {
        _ = sigint => {
            tracing::info!("SIGINT received, starting graceful shutdown...");
        }
        _ = sigterm.recv() => {
            tracing::info!("SIGTERM received, starting graceful shutdown...");
        }
    }
}

/// Wait for shutdown signal (SIGINT only on non-Unix platforms)
#[cfg(not(unix))]
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
