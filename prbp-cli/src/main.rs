//! prbp-cli - Command-line interface for prbp
//!
//! Provides both a REPL and one-shot command execution.

mod commands;
mod repl;

use clap::{Parser, Subcommand};
use colored::Colorize;
use prbp_client::{Client, ConnectionConfig};
use prbp_storage::FileStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prbp-cli")]
#[command(about = "Command-line interface for the PRBP file transfer server")]
#[command(version)]
struct Cli {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: SocketAddr,

    /// Local directory holding files available for upload
    #[arg(long, env = "PRBP_CLIENT_STORAGE", default_value = "client_storage")]
    storage_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start interactive REPL
    Repl,

    /// List files stored on the server
    List,

    /// Upload a file from the local storage directory
    Put {
        /// File name within the storage directory
        filename: String,
    },

    /// Connect, end the session cleanly, and report metrics
    Quit,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // The local storage directory is created if it does not exist yet.
    let store = FileStore::open(&cli.storage_dir).map_err(|e| {
        eprintln!("{}: {}", "Storage error".red(), e);
        e
    })?;

    let config = ConnectionConfig::new(cli.server);
    let mut client = Client::connect(config).await.map_err(|e| {
        eprintln!("{}: {}", "Connection failed".red(), e);
        e
    })?;

    match cli.command {
        Some(Commands::Repl) | None => {
            repl::run(&mut client, cli.server, &store).await?;
        }
        Some(Commands::Quit) => {
            let _ = client.request_quit().await;
            finish_session(&mut client).await;
        }
        Some(cmd) => {
            match commands::execute(&mut client, cmd, &store).await {
                Ok(output) => println!("{}", output),
                Err(e) => {
                    eprintln!("{}: {}", "Error".red(), e);
                    std::process::exit(1);
                }
            }
            let _ = client.request_quit().await;
            finish_session(&mut client).await;
        }
    }

    Ok(())
}

/// Closes the connection and prints the session report to stderr, keeping
/// stdout reserved for command output.
async fn finish_session(client: &mut Client) {
    let _ = client.close().await;
    eprintln!("{}", "Disconnected from server.".dimmed());
    eprintln!("\n{}", "Session metrics".bold());
    eprintln!("{}", client.metrics().summary());
}
