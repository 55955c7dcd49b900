//! # prbp-storage
//!
//! Storage layer for prbp.
//!
//! This crate provides:
//! - Flat-directory file persistence for the server
//! - File name validation against path traversal
//! - Sorted directory listings

pub mod error;
pub mod store;

pub use error::StorageError;
pub use store::FileStore;
