//! Incremental decoder for PRBP byte streams.

use crate::command::{Command, Role};
use crate::error::FrameError;
use crate::frame::Header;
use bytes::{Bytes, BytesMut};

/// Decodes commands from a stream of bytes fed in arbitrary chunks.
///
/// Feed reads with [`extend`](Decoder::extend), then drain complete
/// commands with [`decode_request`](Decoder::decode_request) or
/// [`decode_response`](Decoder::decode_response) until `Ok(None)`.
/// Encoding needs no buffering; use [`Command::encode`] directly.
pub struct Decoder {
    buffer: BytesMut,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(8192),
        }
    }

    /// Appends data to the internal buffer.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Appends bytes to the internal buffer.
    pub fn extend_bytes(&mut self, data: Bytes) {
        self.buffer.extend_from_slice(&data);
    }

    /// Attempts to decode the next request from the buffer.
    pub fn decode_request(&mut self) -> Result<Option<Command>, FrameError> {
        Command::decode(&mut self.buffer, Role::Request)
    }

    /// Attempts to decode the next response from the buffer.
    pub fn decode_response(&mut self) -> Result<Option<Command>, FrameError> {
        Command::decode(&mut self.buffer, Role::Response)
    }

    /// Returns the number of bytes currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Clears the internal buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Classifies leftover bytes after the peer ended the stream.
    ///
    /// Returns `None` when the buffer is empty, meaning the stream
    /// ended on a frame boundary. Otherwise the residue is a frame cut
    /// short: either the header newline never arrived, or the header
    /// was complete and the payload fell short of its declared length.
    pub fn truncation_error(&self) -> Option<FrameError> {
        if self.buffer.is_empty() {
            return None;
        }
        let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') else {
            return Some(FrameError::TruncatedHeader);
        };
        match Header::parse(&self.buffer[..newline]) {
            Ok(header) => Some(FrameError::TruncatedPayload {
                declared: header.payload_len,
                available: self.buffer.len() - newline - 1,
            }),
            Err(e) => Some(e),
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
