//! Persisted block storage for dagseal
//!
//! This crate provides:
//! - A sled-backed block store keyed by node id
//! - Sealed-record write-back after a successful sealing operation
//! - Filesystem import into DAG nodes

pub mod blocks;
pub mod import;

// Re-exports
pub use blocks::BlockStore;
pub use import::{import_bytes, import_path, CHUNK_SIZE};

/// Result type for store operations
pub type Result<T> = anyhow::Result<T>;
