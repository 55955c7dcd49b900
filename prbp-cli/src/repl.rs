//! Interactive REPL.

use colored::Colorize;
use prbp_client::{Client, ClientError};
use prbp_storage::FileStore;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::net::SocketAddr;

const HELP_TEXT: &str = r#"
Available commands:
  HELP                Show this help
  LIST                List files stored on the server
  PUT <filename>      Upload a file from the local storage directory
  QUIT                End the session and exit
"#;

pub async fn run(
    client: &mut Client,
    addr: SocketAddr,
    store: &FileStore,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "prbp CLI".bold().cyan());
    println!("Connected to server at {}", addr);
    println!("Local storage directory: {}", store.root().display());

    // Create readline editor
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl: Editor<(), DefaultHistory> = Editor::with_config(config)?;

    // Load history
    let history_path = std::env::var("HOME")
        .map(|h| std::path::PathBuf::from(h).join(".prbp_history"))
        .unwrap_or_else(|_| ".prbp_history".into());
    let _ = rl.load_history(&history_path);

    println!("Type 'HELP' for available commands.\n");

    loop {
        let prompt = format!("{} ", "prbp>".cyan());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match execute_repl_command(client, line, store).await {
                    Ok(Some(output)) => println!("{}\n", output),
                    Ok(None) => break, // QUIT
                    Err(e) => {
                        // A failed exchange leaves the stream in an unknown
                        // position, so the session cannot continue.
                        println!("{}: {}", "Error".red(), e);
                        break;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                let _ = client.request_quit().await;
                break;
            }
            Err(err) => {
                println!("{}: {:?}", "Error".red(), err);
                break;
            }
        }
    }

    // Save history
    let _ = rl.save_history(&history_path);

    // Disconnect
    let _ = client.close().await;
    println!("{}", "Disconnected from server.".dimmed());
    println!("\n{}", "Session metrics".bold());
    println!("{}", client.metrics().summary());

    Ok(())
}

async fn execute_repl_command(
    client: &mut Client,
    line: &str,
    store: &FileStore,
) -> Result<Option<String>, ClientError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Ok(Some(String::new()));
    }

    let cmd = parts[0].to_uppercase();
    let args = &parts[1..];

    match cmd.as_str() {
        "HELP" | "?" => Ok(Some(HELP_TEXT.to_string())),

        "LIST" => {
            let listing = client.request_list().await?;
            Ok(Some(format_listing(&listing)))
        }

        "PUT" => {
            if args.is_empty() {
                return Ok(Some("Usage: PUT <filename>".to_string()));
            }
            let filename = args[0];
            let content = match store.read_file(filename) {
                Ok(content) => content,
                Err(e) => {
                    // A missing local file should not end the session.
                    return Ok(Some(format!("{}: {}", "Error reading file".red(), e)));
                }
            };
            let status = client.request_put(filename, &content).await?;
            Ok(Some(format!(
                "Server response: {}",
                String::from_utf8_lossy(&status)
            )))
        }

        "QUIT" | "EXIT" | "Q" => {
            let _ = client.request_quit().await;
            Ok(None)
        }

        _ => Ok(Some(format!(
            "Unknown command: {}. Available commands: LIST, PUT <filename>, QUIT",
            cmd
        ))),
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
