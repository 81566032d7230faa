//! dagseal core - content-addressed DAG primitives and sealed-record model
//!
//! This crate provides:
//! - BLAKE3 node identifiers
//! - DAG node encoding and the DAG store contract
//! - Sealed-record model (detect / serialize / merge)
//! - The process-wide exclusion set

pub mod hash;
pub mod node;
pub mod dag;
pub mod sealed;
pub mod exclusion;
pub mod error;

// Re-export main types for convenience
pub use hash::{Codec, NodeId};
pub use node::DagNode;
pub use dag::{DagStore, MemoryDagStore};
pub use sealed::{detect_sealed, SealedAggregate, SealedBlock, SealedMap};
pub use exclusion::ExclusionSet;
pub use error::DagError;
