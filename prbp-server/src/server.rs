//! TCP server implementation.

use crate::error::ServerError;
use crate::handler::CommandHandler;
use crate::session::Session;
use prbp_protocol::Decoder;
use prbp_storage::FileStore;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            max_connections: 1000,
        }
    }
}

impl ServerConfig {
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Default::default()
        }
    }

    /// Sets the maximum number of concurrent connections.
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }
}

/// Server statistics.
#[derive(Debug, Default)]
pub struct ServerStats {
    pub connections_total: AtomicU64,
    pub connections_active: AtomicU64,
    pub requests_total: AtomicU64,
    pub errors_total: AtomicU64,
}

/// TCP server answering PRBP requests.
pub struct Server {
    config: ServerConfig,
    handler: Arc<CommandHandler>,
    stats: Arc<ServerStats>,
    shutdown: broadcast::Sender<()>,
    running: AtomicBool,
}

impl Server {
    /// Creates a new server backed by the given file store.
    pub fn new(config: ServerConfig, store: Arc<FileStore>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            handler: Arc::new(CommandHandler::new(store)),
            stats: Arc::new(ServerStats::default()),
            shutdown: shutdown_tx,
            running: AtomicBool::new(false),
        }
    }

    /// Runs the server.
    pub async fn run(&self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.running.store(true, Ordering::SeqCst);

        tracing::info!("Server listening on {}", self.config.bind_addr);

        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            if self.stats.connections_active.load(Ordering::Relaxed)
                                >= self.config.max_connections as u64
                            {
                                tracing::warn!("Connection limit reached, rejecting {}", addr);
                                continue;
                            }

                            self.stats.connections_total.fetch_add(1, Ordering::Relaxed);
                            self.stats.connections_active.fetch_add(1, Ordering::Relaxed);

                            let handler = self.handler.clone();
                            let stats = self.stats.clone();
                            let mut conn_shutdown = self.shutdown.subscribe();

                            tokio::spawn(async move {
                                let result = Self::handle_connection(
                                    stream,
                                    addr,
                                    handler,
                                    stats.clone(),
                                    &mut conn_shutdown,
                                )
                                .await;
                                Self::finish_connection(&stats, addr, result);
                            });
                        }
                        Err(e) => {
                            tracing::error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Server shutting down");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Handles a single connection until QUIT, EOF, or an error.
    async fn handle_connection<S>(
        mut stream: S,
        addr: SocketAddr,
        handler: Arc<CommandHandler>,
        stats: Arc<ServerStats>,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> Result<(), ServerError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut session = Session::new(addr);
        tracing::info!("Client connected: {} (session {})", addr, session.id);

        let mut decoder = Decoder::new();
        let mut buf = [0u8; 8192];

        loop {
            tokio::select! {
                result = stream.read(&mut buf) => {
                    match result {
                        Ok(0) => {
                            // EOF between frames is a normal close; EOF inside
                            // a frame means the client died mid-request.
                            return match decoder.truncation_error() {
                                None => {
                                    tracing::debug!("[{}] Connection closed by client", addr);
                                    Ok(())
                                }
                                Some(e) => {
                                    tracing::warn!("[{}] Stream ended mid-frame: {}", addr, e);
                                    Err(ServerError::Frame(e))
                                }
                            };
                        }
                        Ok(n) => {
                            tracing::debug!("[{}] Received {} bytes", addr, n);
                            decoder.extend(&buf[..n]);
                        }
                        Err(e) => {
                            tracing::debug!("[{}] Read error: {}", addr, e);
                            return Err(ServerError::Io(e));
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("[{}] Shutdown signal received", addr);
                    return Err(ServerError::ShuttingDown);
                }
            }

            // Process any complete requests
            loop {
                let request = match decoder.decode_request() {
                    Ok(Some(request)) => request,
                    Ok(None) => break,
                    Err(e) => {
                        // No response for a frame we cannot parse; drop the
                        // connection instead of guessing at a reply.
                        tracing::warn!("[{}] Malformed request: {}", addr, e);
                        return Err(ServerError::Frame(e));
                    }
                };

                stats.requests_total.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    "[{}] Request: {} ({} bytes)",
                    addr,
                    request.operation,
                    request.payload_len()
                );

                let response = handler.handle(&mut session, &request);

                tracing::debug!(
                    "[{}] Response: {} ({} bytes)",
                    addr,
                    response.operation,
                    response.payload_len()
                );
                stream.write_all(&response.encode()).await?;

                // QUIT acknowledged; any bytes still buffered are discarded.
                if session.is_terminated() {
                    tracing::debug!(
                        "[{}] Session {} ended: {} requests in {:?}",
                        session.remote_addr,
                        session.id,
                        session.request_count(),
                        session.age()
                    );
                    return Ok(());
                }
            }
        }
    }

    /// Records the outcome of a finished connection.
    ///
    /// A handler stopped by server shutdown ended normally; only real
    /// faults count into `errors_total`.
    fn finish_connection(stats: &ServerStats, addr: SocketAddr, result: Result<(), ServerError>) {
        match result {
            Ok(()) => {}
            Err(ServerError::ShuttingDown) => {
                tracing::debug!("Connection {} closed by shutdown", addr);
            }
            Err(e) => {
                tracing::debug!("Connection {} error: {}", addr, e);
                stats.errors_total.fetch_add(1, Ordering::Relaxed);
            }
        }
        stats.connections_active.fetch_sub(1, Ordering::Relaxed);
        tracing::info!("Client disconnected: {}", addr);
    }

    /// Initiates server shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(());
    }

    /// Returns whether the server is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns server statistics.
    pub fn stats(&self) -> &ServerStats {
        &self.stats
    }
}
