//! # prbp-protocol
//!
//! Wire protocol implementation for prbp (PRBP - a line-framed file
//! transfer protocol).
//!
//! This crate provides:
//! - Text header framing with a declared payload length
//! - Request/response command types
//! - Incremental decoder for streaming reads
//! - Frame and payload error types

pub mod codec;
pub mod command;
pub mod error;
pub mod frame;

pub use codec::Decoder;
pub use command::{Command, Operation, PutPayload, Role};
pub use error::{FrameError, PutPayloadError};
pub use frame::{Header, PROTOCOL_TAG};

/// Default port for the prbp server.
pub const DEFAULT_PORT: u16 = 8080;
