//! Command execution.

use crate::Commands;
use colored::Colorize;
use prbp_client::Client;
use prbp_storage::FileStore;

/// Executes a one-shot command and returns the formatted output.
pub async fn execute(
    client: &mut Client,
    cmd: Commands,
    store: &FileStore,
) -> Result<String, Box<dyn std::error::Error>> {
    match cmd {
        Commands::Repl => unreachable!(),

        Commands::List => {
            let listing = client.request_list().await?;
            Ok(format_listing(&listing))
        }

        Commands::Put { filename } => {
            let content = store.read_file(&filename)?;
            let status = client.request_put(&filename, &content).await?;
            Ok(format!(
                "Server response: {}",
                String::from_utf8_lossy(&status)
            ))
        }

        // Quit is handled in main.rs (every one-shot session ends with QUIT)
        Commands::Quit => unreachable!(),
    }
}

/// Renders a LIST payload for display.
fn format_listing(listing: &[u8]) -> String {
    if listing.is_empty() {
        return "No files found on server.".yellow().to_string();
    }

    let text = String::from_utf8_lossy(listing);
    let mut output = format!("{}\n", "Files on server:".bold());
    for name in text.lines() {
        output.push_str(&format!("  {}\n", name.cyan()));
    }
    output.trim_end().to_string()
}
