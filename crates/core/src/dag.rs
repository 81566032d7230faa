//! DAG store contract and an in-memory implementation

use crate::error::DagError;
use crate::hash::NodeId;
use crate::node::DagNode;
use async_trait::async_trait;
use dashmap::DashMap;

/// Resolves node ids to nodes
///
/// Implementations must be safe to share across tasks; the sealing
/// orchestrator calls `get` from a single driver but holds the store
/// across await points.
#[async_trait]
pub trait DagStore: Send + Sync {
    /// Resolve `id`, or fail with [`DagError::NotFound`]
    async fn get(&self, id: &NodeId) -> Result<DagNode, DagError>;
}

#[async_trait]
impl<T: DagStore + ?Sized> DagStore for std::sync::Arc<T> {
    async fn get(&self, id: &NodeId) -> Result<DagNode, DagError> {
        (**self).get(id).await
    }
}

/// DAG store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryDagStore {
    nodes: DashMap<NodeId, DagNode>,
}

impl MemoryDagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, returning its id
    pub fn put(&self, node: DagNode) -> NodeId {
        let id = node.id();
        self.nodes.insert(id, node);
        id
    }

    /// Drop a node (used to simulate dangling links)
    pub fn remove(&self, id: &NodeId) -> Option<DagNode> {
        self.nodes.remove(id).map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[async_trait]
impl DagStore for MemoryDagStore {
    async fn get(&self, id: &NodeId) -> Result<DagNode, DagError> {
        self.nodes
            .get(id)
            .map(|node| node.value().clone())
            .ok_or(DagError::NotFound(*id))
    }
}
