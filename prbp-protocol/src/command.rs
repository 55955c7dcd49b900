//! PRBP commands: the request/response envelope and its wire form.

use crate::error::{FrameError, PutPayloadError};
use crate::frame::Header;
use bytes::{Buf, Bytes, BytesMut};
use std::fmt;

/// Operations defined by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// List the files held by the server.
    List,
    /// Store a file on the server.
    Put,
    /// End the session.
    Quit,
}

impl Operation {
    /// Returns the wire token for this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "LIST",
            Operation::Put => "PUT",
            Operation::Quit => "QUIT",
        }
    }

    /// Parses a wire token. Matching is exact; tokens are case
    /// sensitive on the wire.
    pub fn parse_token(token: &[u8]) -> Option<Self> {
        match token {
            b"LIST" => Some(Operation::List),
            b"PUT" => Some(Operation::Put),
            b"QUIT" => Some(Operation::Quit),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which direction a command travels.
///
/// Role is not carried on the wire; requests and responses share one
/// frame format, and each side knows which kind it is reading from the
/// direction of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Request,
    Response,
}

/// A single PRBP command, either direction.
///
/// There is no stored payload length. The length on the wire is
/// recomputed from the payload at encode time, so the two can never
/// disagree.
#[derive(Debug, Clone)]
pub struct Command {
    /// Direction this command travels.
    pub role: Role,
    /// Operation the command names.
    pub operation: Operation,
    /// Raw payload bytes.
    pub payload: Bytes,
}

impl Command {
    /// Creates a request with an empty payload.
    pub fn request(operation: Operation) -> Self {
        Self {
            role: Role::Request,
            operation,
            payload: Bytes::new(),
        }
    }

    /// Creates a response with an empty payload.
    pub fn response(operation: Operation) -> Self {
        Self {
            role: Role::Response,
            operation,
            payload: Bytes::new(),
        }
    }

    /// Sets the payload.
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Returns the payload length in bytes.
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Encodes the command into wire bytes: header line then payload.
    pub fn encode(&self) -> BytesMut {
        let header = Header::new(self.operation, self.payload.len()).encode();
        let mut buf = BytesMut::with_capacity(header.len() + self.payload.len());
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Decodes one command from the front of `buf`, consuming it.
    ///
    /// Returns `Ok(Some(command))` if a complete frame was present,
    /// `Ok(None)` if more bytes are needed, or `Err` on malformed
    /// input. Nothing is consumed until a full frame is available, so
    /// the caller can keep appending bytes and retrying. The caller
    /// supplies the role since it is not on the wire.
    pub fn decode(buf: &mut BytesMut, role: Role) -> Result<Option<Self>, FrameError> {
        // Wait for the header line
        let Some(newline) = buf.iter().position(|&b| b == b'\n') else {
            return Ok(None);
        };

        // Parse without consuming
        let header = Header::parse(&buf[..newline])?;

        // Compare buffered payload bytes against the declared length;
        // summing `newline + 1 + payload_len` overflows on a hostile
        // declared length near usize::MAX.
        let available = buf.len() - newline - 1;
        if available < header.payload_len {
            return Ok(None);
        }

        buf.advance(newline + 1);
        let payload = buf.split_to(header.payload_len).freeze();

        Ok(Some(Self {
            role,
            operation: header.operation,
            payload,
        }))
    }
}

/// The payload of a PUT request: file name, one newline, then the file
/// content verbatim.
///
/// Only the first newline separates; the content may contain any bytes,
/// newlines included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PutPayload<'a> {
    /// Target file name, whitespace-trimmed.
    pub filename: &'a str,
    /// File content.
    pub content: &'a [u8],
}

impl<'a> PutPayload<'a> {
    pub fn new(filename: &'a str, content: &'a [u8]) -> Self {
        Self { filename, content }
    }

    /// Encodes the payload for the wire.
    pub fn encode(&self) -> Bytes {
        let mut buf = Vec::with_capacity(self.filename.len() + 1 + self.content.len());
        buf.extend_from_slice(self.filename.as_bytes());
        buf.push(b'\n');
        buf.extend_from_slice(self.content);
        Bytes::from(buf)
    }

    /// Splits a raw PUT payload into file name and content.
    pub fn parse(payload: &'a [u8]) -> Result<Self, PutPayloadError> {
        if payload.is_empty() {
            return Err(PutPayloadError::Empty);
        }
        let newline = payload
            .iter()
            .position(|&b| b == b'\n')
            .ok_or(PutPayloadError::MissingSeparator)?;
        let filename = std::str::from_utf8(&payload[..newline])
            .map_err(|_| PutPayloadError::FileNameNotUtf8)?
            .trim();
        Ok(Self {
            filename,
            content: &payload[newline + 1..],
        })
    }
}
