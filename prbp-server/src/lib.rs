//! # prbp-server
//!
//! TCP server for prbp.
//!
//! This crate provides:
//! - TCP connection handling with async I/O
//! - Incremental request decoding and dispatch
//! - Session management
//! - Command handlers for LIST, PUT, and QUIT
//! - YAML configuration with environment overrides

pub mod config;
pub mod error;
pub mod handler;
pub mod server;
pub mod session;

pub use config::{Config, ConfigError, NetworkConfig, StorageConfig};
pub use error::ServerError;
pub use handler::CommandHandler;
pub use server::{Server, ServerConfig, ServerStats};
pub use session::{Session, SessionState};
