//! Storage error types.

use thiserror::Error;

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("failed to create file '{name}': {source}")]
    CreateFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file '{name}': {source}")]
    WriteFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
