//! High-level client API.

use crate::connection::{Connection, ConnectionConfig};
use crate::error::ClientError;
use crate::metrics::SessionMetrics;
use bytes::Bytes;
use tokio::net::TcpStream;

/// High-level client for prbp.
pub struct Client {
    conn: Connection<TcpStream>,
}

impl Client {
    /// Connects to the server.
    pub async fn connect(config: ConnectionConfig) -> Result<Self, ClientError> {
        tracing::debug!("Connecting to {}...", config.addr);
        let stream = TcpStream::connect(config.addr).await?;
        stream.set_nodelay(true).ok();
        tracing::debug!("TCP connected");

        Ok(Self {
            conn: Connection::new(stream, config.read_buffer_size),
        })
    }

    /// Requests the server's file listing.
    pub async fn request_list(&mut self) -> Result<Bytes, ClientError> {
        self.conn.request_list().await
    }

    /// Uploads a file under the given name.
    pub async fn request_put(
        &mut self,
        filename: &str,
        content: &[u8],
    ) -> Result<Bytes, ClientError> {
        self.conn.request_put(filename, content).await
    }

    /// Ends the session, returning the server's ack payload if one arrived.
    pub async fn request_quit(&mut self) -> Option<Bytes> {
        self.conn.request_quit().await
    }

    /// Returns the session metrics.
    pub fn metrics(&self) -> &SessionMetrics {
        self.conn.metrics()
    }

    /// Closes the connection.
    pub async fn close(&mut self) -> Result<(), ClientError> {
        self.conn.close().await
    }
}
