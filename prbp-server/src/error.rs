//! Server error types.

use thiserror::Error;

/// Server errors.
///
/// These are connection-fatal conditions. Operation-level failures
/// such as a bad PUT payload never appear here; they travel back to
/// the client as error responses and the session continues.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Frame(#[from] prbp_protocol::FrameError),

    #[error("storage error: {0}")]
    Storage(#[from] prbp_storage::StorageError),

    #[error("server shutting down")]
    ShuttingDown,
}
