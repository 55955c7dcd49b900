//! Connection management.

use crate::error::ClientError;
use crate::metrics::SessionMetrics;
use bytes::Bytes;
use prbp_protocol::{Command, Decoder, Operation, PutPayload};
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Default read buffer size (8 KiB).
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Minimum read buffer size (1 KiB).
pub const MIN_READ_BUFFER_SIZE: usize = 1024;

/// Maximum read buffer size (1 MiB).
pub const MAX_READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Server address.
    pub addr: SocketAddr,
    /// Read buffer size for socket reads.
    pub read_buffer_size: usize,
}

impl ConnectionConfig {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.clamp(MIN_READ_BUFFER_SIZE, MAX_READ_BUFFER_SIZE);
        self
    }
}

/// A connection to a PRBP server.
///
/// Requests and responses strictly alternate on the wire, so the whole
/// exchange lives in one task; there is no pipelining to dispatch.
pub struct Connection<S> {
    stream: S,
    decoder: Decoder,
    buf: Vec<u8>,
    metrics: SessionMetrics,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an established stream.
    pub fn new(stream: S, read_buffer_size: usize) -> Self {
        Self {
            stream,
            decoder: Decoder::new(),
            buf: vec![0u8; read_buffer_size],
            metrics: SessionMetrics::new(),
        }
    }

    /// Sends one request frame.
    async fn send_request(&mut self, request: &Command) -> Result<(), ClientError> {
        let encoded = request.encode();
        tracing::debug!(
            "Sending {} request ({} bytes)",
            request.operation,
            encoded.len()
        );
        self.stream.write_all(&encoded).await?;
        self.metrics.record_sent(encoded.len());
        Ok(())
    }

    /// Reads until one complete response frame is decoded.
    async fn read_response(&mut self) -> Result<Command, ClientError> {
        loop {
            if let Some(response) = self.decoder.decode_response()? {
                return Ok(response);
            }

            let n = self.stream.read(&mut self.buf).await?;
            if n == 0 {
                return match self.decoder.truncation_error() {
                    Some(e) => Err(ClientError::Frame(e)),
                    None => Err(ClientError::ConnectionClosed),
                };
            }
            tracing::debug!("Received {} bytes", n);
            self.metrics.record_received(n);
            self.decoder.extend(&self.buf[..n]);
        }
    }

    /// Sends a request and waits for the matching response.
    async fn round_trip(&mut self, request: Command) -> Result<Command, ClientError> {
        let expected = request.operation;
        self.send_request(&request).await?;
        let response = self.read_response().await?;
        if response.operation != expected {
            return Err(ClientError::UnexpectedOperation {
                expected,
                got: response.operation,
            });
        }
        Ok(response)
    }

    /// Requests the server's file listing.
    ///
    /// Returns the raw listing payload: one name per line, empty when the
    /// server has no files.
    pub async fn request_list(&mut self) -> Result<Bytes, ClientError> {
        let response = self.round_trip(Command::request(Operation::List)).await?;
        Ok(response.payload)
    }

    /// Uploads a file under the given name. Returns the server's status
    /// payload ("OK" or an error message).
    pub async fn request_put(
        &mut self,
        filename: &str,
        content: &[u8],
    ) -> Result<Bytes, ClientError> {
        let payload = PutPayload::new(filename, content).encode();
        let request = Command::request(Operation::Put).with_payload(payload);
        let response = self.round_trip(request).await?;
        Ok(response.payload)
    }

    /// Ends the session. Best effort: the server may already be gone, so
    /// failures sending QUIT or reading the ack are logged and swallowed.
    pub async fn request_quit(&mut self) -> Option<Bytes> {
        let request = Command::request(Operation::Quit);
        if let Err(e) = self.send_request(&request).await {
            tracing::debug!("QUIT send failed: {}", e);
            return None;
        }
        match self.read_response().await {
            Ok(response) => Some(response.payload),
            Err(e) => {
                tracing::debug!("QUIT ack not received: {}", e);
                None
            }
        }
    }

    /// Returns the session metrics.
    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    /// Shuts down the write side of the stream.
    pub async fn close(&mut self) -> Result<(), ClientError> {
        tracing::debug!("Closing connection...");
        self.stream.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prbp_protocol::FrameError;

    #[test]
    fn test_config_defaults() {
        let config = ConnectionConfig::new("127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.read_buffer_size, DEFAULT_READ_BUFFER_SIZE);
    }

    #[test]
    fn test_config_buffer_clamping() {
        let config =
            ConnectionConfig::new("127.0.0.1:8080".parse().unwrap()).with_read_buffer_size(100); // Below minimum
        assert_eq!(config.read_buffer_size, MIN_READ_BUFFER_SIZE);

        let config = ConnectionConfig::new("127.0.0.1:8080".parse().unwrap())
            .with_read_buffer_size(10 * 1024 * 1024); // Above maximum
        assert_eq!(config.read_buffer_size, MAX_READ_BUFFER_SIZE);
    }

    #[tokio::test]
    async fn test_list_round_trip() {
        let mock = tokio_test::io::Builder::new()
            .write(b"PRBP LIST 0\n")
            .read(b"PRBP LIST 8\na.txt\nb\n")
            .build();
        let mut conn = Connection::new(mock, DEFAULT_READ_BUFFER_SIZE);

        let listing = conn.request_list().await.unwrap();
        assert_eq!(&listing[..], b"a.txt\nb\n");
    }

    #[tokio::test]
    async fn test_put_round_trip() {
        let mock = tokio_test::io::Builder::new()
            .write(b"PRBP PUT 15\nnotes.txt\nhello")
            .read(b"PRBP PUT 2\nOK")
            .build();
        let mut conn = Connection::new(mock, DEFAULT_READ_BUFFER_SIZE);

        let status = conn.request_put("notes.txt", b"hello").await.unwrap();
        assert_eq!(&status[..], b"OK");
    }

    #[tokio::test]
    async fn test_response_split_across_reads() {
        let mock = tokio_test::io::Builder::new()
            .write(b"PRBP LIST 0\n")
            .read(b"PRBP LI")
            .read(b"ST 7\nab.txt\n")
            .build();
        let mut conn = Connection::new(mock, DEFAULT_READ_BUFFER_SIZE);

        let listing = conn.request_list().await.unwrap();
        assert_eq!(&listing[..], b"ab.txt\n");
    }

    #[tokio::test]
    async fn test_mismatched_response_operation() {
        let mock = tokio_test::io::Builder::new()
            .write(b"PRBP LIST 0\n")
            .read(b"PRBP PUT 2\nOK")
            .build();
        let mut conn = Connection::new(mock, DEFAULT_READ_BUFFER_SIZE);

        let result = conn.request_list().await;
        assert!(matches!(
            result,
            Err(ClientError::UnexpectedOperation {
                expected: Operation::List,
                got: Operation::Put,
            })
        ));
    }

    #[tokio::test]
    async fn test_quit_acknowledged() {
        let mock = tokio_test::io::Builder::new()
            .write(b"PRBP QUIT 0\n")
            .read(b"PRBP QUIT 0\n")
            .build();
        let mut conn = Connection::new(mock, DEFAULT_READ_BUFFER_SIZE);

        let ack = conn.request_quit().await;
        assert_eq!(ack, Some(Bytes::new()));
    }

    #[tokio::test]
    async fn test_quit_tolerates_no_ack() {
        let (client_side, mut server_side) = tokio::io::duplex(1024);
        let mut conn = Connection::new(client_side, DEFAULT_READ_BUFFER_SIZE);

        let server = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let _ = server_side.read(&mut buf).await;
            // Hang up without acknowledging.
        });

        let ack = conn.request_quit().await;
        assert!(ack.is_none());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_eof_without_response() {
        let (client_side, mut server_side) = tokio::io::duplex(1024);
        let mut conn = Connection::new(client_side, DEFAULT_READ_BUFFER_SIZE);

        let server = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let _ = server_side.read(&mut buf).await;
        });

        let result = conn.request_list().await;
        assert!(matches!(result, Err(ClientError::ConnectionClosed)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_eof_mid_response() {
        let (client_side, mut server_side) = tokio::io::duplex(1024);
        let mut conn = Connection::new(client_side, DEFAULT_READ_BUFFER_SIZE);

        let server = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let _ = server_side.read(&mut buf).await;
            server_side
                .write_all(b"PRBP LIST 100\npartial")
                .await
                .unwrap();
        });

        let result = conn.request_list().await;
        assert!(matches!(
            result,
            Err(ClientError::Frame(FrameError::TruncatedPayload {
                declared: 100,
                available: 7,
            }))
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_metrics_count_wire_bytes() {
        let mock = tokio_test::io::Builder::new()
            .write(b"PRBP LIST 0\n")
            .read(b"PRBP LIST 0\n")
            .build();
        let mut conn = Connection::new(mock, DEFAULT_READ_BUFFER_SIZE);

        conn.request_list().await.unwrap();
        assert_eq!(conn.metrics().bytes_sent(), 12);
        assert_eq!(conn.metrics().bytes_received(), 12);
    }
}
