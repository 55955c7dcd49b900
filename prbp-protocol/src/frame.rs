//! Text frame header for PRBP.
//!
//! Frame layout (one header line + raw payload):
//!
//! ```text
//! +------+----+-----------+----+----------+----+
//! | PRBP | SP | OPERATION | SP | LENGTH   | LF |
//! +------+----+-----------+----+----------+----+
//! | payload: LENGTH raw bytes, no terminator   |
//! +--------------------------------------------+
//! ```
//!
//! The LENGTH token is optional on input; a header without it declares
//! an empty payload. The declared length is authoritative: payload
//! bytes are read by count, never by scanning for a delimiter, so a
//! payload may itself contain newlines.

use crate::command::Operation;
use crate::error::FrameError;

/// Tag identifying PRBP frames, the first token of every header.
pub const PROTOCOL_TAG: &[u8] = b"PRBP";

/// A parsed PRBP header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Operation named by the header.
    pub operation: Operation,
    /// Declared payload length in bytes.
    pub payload_len: usize,
}

impl Header {
    /// Creates a header for the given operation and payload length.
    pub fn new(operation: Operation, payload_len: usize) -> Self {
        Self {
            operation,
            payload_len,
        }
    }

    /// Encodes the header line, including the trailing newline.
    ///
    /// The length token is always emitted, even for empty payloads.
    pub fn encode(&self) -> String {
        format!("PRBP {} {}\n", self.operation, self.payload_len)
    }

    /// Parses a header from the bytes of one line, excluding the
    /// trailing newline.
    ///
    /// The line is split on single spaces into at most three tokens:
    /// tag, operation, length. A third token holding anything but a
    /// decimal length (including embedded spaces) is rejected; a
    /// missing third token means a zero-length payload.
    pub fn parse(line: &[u8]) -> Result<Self, FrameError> {
        let mut tokens = line.splitn(3, |&b| b == b' ');

        let tag = tokens.next().unwrap_or_default();
        if tag != PROTOCOL_TAG {
            return Err(FrameError::BadProtocolTag(lossy(tag)));
        }

        let op_token = tokens.next().unwrap_or_default();
        let operation = Operation::parse_token(op_token)
            .ok_or_else(|| FrameError::UnknownOperation(lossy(op_token)))?;

        let payload_len = match tokens.next() {
            Some(token) => std::str::from_utf8(token)
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .ok_or_else(|| FrameError::BadLength(lossy(token)))?,
            None => 0,
        };

        Ok(Self {
            operation,
            payload_len,
        })
    }
}

fn lossy(token: &[u8]) -> String {
    String::from_utf8_lossy(token).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = Header::new(Operation::Put, 42);
        let encoded = header.encode();
        assert_eq!(encoded, "PRBP PUT 42\n");

        let parsed = Header::parse(encoded.trim_end().as_bytes()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_header_without_length_token() {
        // Two-token headers are valid and declare an empty payload
        let parsed = Header::parse(b"PRBP LIST").unwrap();
        assert_eq!(parsed.operation, Operation::List);
        assert_eq!(parsed.payload_len, 0);
    }

    #[test]
    fn test_bad_protocol_tag() {
        let result = Header::parse(b"HTTP LIST 0");
        assert!(matches!(result, Err(FrameError::BadProtocolTag(_))));

        let result = Header::parse(b"prbp LIST 0");
        assert!(matches!(result, Err(FrameError::BadProtocolTag(_))));
    }

    #[test]
    fn test_unknown_operation() {
        let result = Header::parse(b"PRBP GET 0");
        assert!(matches!(result, Err(FrameError::UnknownOperation(op)) if op == "GET"));

        // Lowercase operations are not recognized
        let result = Header::parse(b"PRBP list 0");
        assert!(matches!(result, Err(FrameError::UnknownOperation(_))));
    }

    #[test]
    fn test_missing_operation() {
        let result = Header::parse(b"PRBP");
        assert!(matches!(result, Err(FrameError::UnknownOperation(op)) if op.is_empty()));

        let result = Header::parse(b"PRBP ");
        assert!(matches!(result, Err(FrameError::UnknownOperation(_))));
    }

    #[test]
    fn test_bad_length() {
        let result = Header::parse(b"PRBP PUT abc");
        assert!(matches!(result, Err(FrameError::BadLength(_))));

        let result = Header::parse(b"PRBP PUT -1");
        assert!(matches!(result, Err(FrameError::BadLength(_))));

        // A trailing space leaves an empty length token
        let result = Header::parse(b"PRBP LIST ");
        assert!(matches!(result, Err(FrameError::BadLength(_))));

        // Extra tokens fold into the length token and fail the parse
        let result = Header::parse(b"PRBP PUT 12 junk");
        assert!(matches!(result, Err(FrameError::BadLength(len)) if len == "12 junk"));

        // Carriage returns are not stripped
        let result = Header::parse(b"PRBP LIST 0\r");
        assert!(matches!(result, Err(FrameError::BadLength(_))));
    }

    #[test]
    fn test_empty_line() {
        let result = Header::parse(b"");
        assert!(matches!(result, Err(FrameError::BadProtocolTag(_))));
    }

    #[test]
    fn test_zero_length_token() {
        let parsed = Header::parse(b"PRBP QUIT 0").unwrap();
        assert_eq!(parsed.operation, Operation::Quit);
        assert_eq!(parsed.payload_len, 0);
    }
}
