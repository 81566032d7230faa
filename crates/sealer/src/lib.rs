//! DAG sealing orchestration
//!
//! This crate provides:
//! - A bounded task pool with a completion barrier
//! - The sealing service client (trait + HTTP implementation)
//! - Session keys threaded through one sealing operation
//! - The recursive DAG sealing orchestrator
//! - A passthrough reader that unseals persisted records on demand
//! - Sealer configuration

pub mod error;
pub mod pool;
pub mod session;
pub mod client;
pub mod http;
pub mod orchestrator;
pub mod reader;
pub mod config;

// Re-exports
pub use error::SealError;
pub use pool::{TaskPool, Ticket};
pub use session::{RandomSessionKeys, SessionKey, SessionKeySource};
pub use client::{SealReply, SealingClient};
pub use http::HttpSealingClient;
pub use orchestrator::{Orchestrator, SealStatus};
pub use reader::{size_of, PassthroughReader};
pub use config::SealerConfig;

/// Result type for sealing operations
pub type Result<T> = std::result::Result<T, SealError>;
