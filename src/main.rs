//! prbp - PRBP file transfer server
//!
//! A TCP server speaking a minimal line-delimited file-transfer protocol:
//! clients list and upload files held in a flat storage directory.

use prbp_server::{Config, Server, ServerConfig};
use prbp_storage::FileStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration (from file if PRBP_CONFIG is set, then env overrides)
    let config = match Config::load() {
        Ok(c) => {
            if let Ok(path) = std::env::var("PRBP_CONFIG") {
                tracing::info!("Loaded config from {}", path);
            }
            c
        }
        Err(e) => {
            // If a config file was explicitly specified, fail on error
            if std::env::var("PRBP_CONFIG").is_ok() {
                tracing::error!("Failed to load config: {}", e);
                return Err(e.into());
            }
            // Otherwise fall back to defaults
            tracing::info!("Using default configuration");
            Config::default()
        }
    };

    tracing::info!("Starting prbp server");
    tracing::info!("  Bind address: {}", config.network.bind_addr);
    tracing::info!("  Storage directory: {}", config.storage.root_dir.display());
    tracing::info!("  Max connections: {}", config.network.max_connections);

    // Open the file store (creates the storage directory)
    let store = Arc::new(FileStore::open(&config.storage.root_dir)?);

    let server_config = ServerConfig::new(config.network.bind_addr)
        .with_max_connections(config.network.max_connections);
    let server = Arc::new(Server::new(server_config, store));

    // Spawn shutdown signal handler
    let shutdown_server = server.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Received shutdown signal, stopping server...");
        shutdown_server.shutdown();
    });

    // Run server (blocks until shutdown)
    server.run().await?;

    tracing::info!("Server stopped");
    Ok(())
}
