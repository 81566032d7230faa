//! Node ids that are never sealed
//!
//! Built-in entries are the placeholder nodes every importer produces for
//! empty content: the empty leaf and the empty link node.

use crate::hash::NodeId;
use crate::node::DagNode;
use ahash::AHashSet;
use std::sync::OnceLock;

/// Read-only set of ids excluded from sealing
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    ids: AHashSet<NodeId>,
}

impl ExclusionSet {
    /// Empty set (excludes nothing)
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in placeholder ids
    pub fn builtin() -> Self {
        Self::builtin_ids().into_iter().collect()
    }

    /// Built-in placeholders plus `extra`
    pub fn with_extra(extra: impl IntoIterator<Item = NodeId>) -> Self {
        Self::builtin_ids().into_iter().chain(extra).collect()
    }

    /// Shared process-wide default, built once on first use
    pub fn global() -> &'static ExclusionSet {
        static GLOBAL: OnceLock<ExclusionSet> = OnceLock::new();
        GLOBAL.get_or_init(ExclusionSet::builtin)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn builtin_ids() -> [NodeId; 2] {
        [
            DagNode::leaf(Vec::new()).id(),
            DagNode::branch(Vec::new(), b"").id(),
        ]
    }
}

impl FromIterator<NodeId> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
