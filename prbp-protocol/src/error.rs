//! Protocol error types.

use thiserror::Error;

/// Errors raised while parsing PRBP frames off a byte stream.
///
/// The codec itself performs no I/O, so every variant here describes a
/// defect in the bytes, not in the transport. Any of them is fatal for
/// the connection that produced the bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("truncated header: stream ended before the header newline")]
    TruncatedHeader,

    #[error("invalid protocol tag: expected 'PRBP', got {0:?}")]
    BadProtocolTag(String),

    #[error("unknown operation: {0:?}")]
    UnknownOperation(String),

    #[error("invalid payload length: {0:?}")]
    BadLength(String),

    #[error("truncated payload: declared {declared} bytes, got {available}")]
    TruncatedPayload { declared: usize, available: usize },
}

/// Errors raised while splitting a PUT payload into file name and
/// content.
///
/// These are operation-level defects: the frame around them was valid,
/// and the accepting side answers with an error response instead of
/// dropping the connection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PutPayloadError {
    #[error("empty payload")]
    Empty,

    #[error("missing file name separator")]
    MissingSeparator,

    #[error("file name is not valid UTF-8")]
    FileNameNotUtf8,
}
