//! Errors raised while resolving DAG nodes

use crate::hash::NodeId;
use thiserror::Error;

/// Failure resolving or decoding a DAG node
#[derive(Debug, Error)]
pub enum DagError {
    /// The store has no value for this id
    #[error("node not found: {0}")]
    NotFound(NodeId),

    /// The stored value is sealed metadata, not node bytes
    #[error("node {0} is already sealed")]
    Sealed(NodeId),

    /// Stored bytes do not decode to the node they are filed under
    #[error("corrupt node {id}: {reason}")]
    Corrupt { id: NodeId, reason: String },

    /// Malformed identifier text or bytes
    #[error("invalid node id: {0}")]
    InvalidId(String),

    /// Backing store failure
    #[error("dag store backend: {0}")]
    Backend(String),
}
