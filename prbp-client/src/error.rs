//! Client error types.

use prbp_protocol::{FrameError, Operation};
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Frame(#[from] FrameError),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("unexpected response operation: expected {expected}, got {got}")]
    UnexpectedOperation { expected: Operation, got: Operation },
}

impl ClientError {
    /// Returns whether retrying on a fresh connection could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Io(_) => true,
            ClientError::ConnectionClosed => true,
            ClientError::Frame(_) => false,
            ClientError::UnexpectedOperation { .. } => false,
        }
    }
}
