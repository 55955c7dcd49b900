//! Command handlers.

use crate::session::Session;
use prbp_protocol::{Command, Operation, PutPayload, PutPayloadError};
use prbp_storage::{FileStore, StorageError};
use std::sync::Arc;

/// Command handler.
///
/// Produces exactly one response for every well-framed request.
/// Operation failures become error responses; only the framing layer
/// above ever drops a connection.
pub struct CommandHandler {
    store: Arc<FileStore>,
}

impl CommandHandler {
    /// Creates a new command handler over the given store.
    pub fn new(store: Arc<FileStore>) -> Self {
        Self { store }
    }

    /// Handles a request and returns the response to send.
    pub fn handle(&self, session: &mut Session, request: &Command) -> Command {
        session.record_request();

        match request.operation {
            Operation::List => self.handle_list(),
            Operation::Put => self.handle_put(&request.payload),
            Operation::Quit => self.handle_quit(session),
        }
    }

    /// LIST: newline-terminated file names, one per line.
    ///
    /// A storage failure degrades to an empty listing rather than
    /// killing the session; an unreadable directory and an empty one
    /// look the same to the client.
    fn handle_list(&self) -> Command {
        match self.store.list_files() {
            Ok(names) => {
                let mut listing = String::new();
                for name in names {
                    listing.push_str(&name);
                    listing.push('\n');
                }
                Command::response(Operation::List).with_payload(listing)
            }
            Err(e) => {
                tracing::warn!("LIST failed, returning empty listing: {}", e);
                Command::response(Operation::List)
            }
        }
    }

    /// PUT: store the file named in the payload, answer "OK".
    fn handle_put(&self, payload: &[u8]) -> Command {
        let put = match PutPayload::parse(payload) {
            Ok(put) => put,
            Err(PutPayloadError::Empty) => {
                return Self::put_error("Error: No payload");
            }
            Err(e) => {
                tracing::debug!("Rejecting PUT payload: {}", e);
                return Self::put_error("Error: Invalid payload format");
            }
        };

        match self.store.write_file(put.filename, put.content) {
            Ok(()) => Command::response(Operation::Put).with_payload("OK"),
            Err(e @ StorageError::WriteFailed { .. }) => {
                tracing::warn!("PUT failed: {}", e);
                Self::put_error("Error: Writing file")
            }
            Err(e) => {
                tracing::warn!("PUT failed: {}", e);
                Self::put_error("Error: Creating file")
            }
        }
    }

    /// QUIT: acknowledge, then mark the session over.
    fn handle_quit(&self, session: &mut Session) -> Command {
        session.terminate();
        Command::response(Operation::Quit)
    }

    fn put_error(message: &'static str) -> Command {
        Command::response(Operation::Put).with_payload(message)
    }
}
