//! Sealing error taxonomy
//!
//! Business-level rejection by the sealing service is not an error; it is
//! reported through [`crate::SealReply::Rejected`] and
//! [`crate::SealStatus::Rejected`].

use dagseal_core::DagError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SealError {
    /// DAG resolution failed
    #[error(transparent)]
    Dag(#[from] DagError),

    /// Connection or protocol failure talking to the sealing service
    #[error("sealing service transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// The sealing service answered with a non-success HTTP status
    #[error("{operation} error code is: {status}")]
    Status { operation: &'static str, status: u16 },

    /// The sealing service answered 200 with a body we could not parse
    #[error("malformed sealing service response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The sealing service has nothing stored at this location
    #[error("sealed block not found at {location}")]
    NotFound { location: String },

    /// A dispatched sealing task died without reporting
    #[error("sealing task failed: {0}")]
    Task(String),

    /// Invalid sealer configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SealError {
    /// Whether the failure came from the sealing service or the path to it
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SealError::Transport(_) | SealError::Status { .. } | SealError::Malformed(_)
        )
    }
}
