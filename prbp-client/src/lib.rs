//! # prbp-client
//!
//! Client library for prbp.
//!
//! This crate provides:
//! - Async TCP client with sequential request/response exchange
//! - High-level API for the LIST, PUT, and QUIT operations
//! - Per-session transfer metrics

pub mod client;
pub mod connection;
pub mod error;
pub mod metrics;

pub use client::Client;
pub use connection::{Connection, ConnectionConfig};
pub use error::ClientError;
pub use metrics::SessionMetrics;
