//! Block store using sled
//!
//! Keys are the 33-byte node id encoding; values are either encoded node
//! bytes or, once sealed, the JSON sealed record that replaced them.

use crate::Result;
use anyhow::Context;
use async_trait::async_trait;
use dagseal_core::{detect_sealed, DagError, DagNode, DagStore, NodeId, SealedAggregate, SealedMap};
use sled::Db;
use std::path::Path;
use tracing::debug;

/// Content-addressed block store
pub struct BlockStore {
    /// Sled database
    db: Db,
}

impl BlockStore {
    /// Open or create a block store under `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join("blocks.db");
        let db = sled::open(&path).with_context(|| format!("open block store {}", path.display()))?;
        Ok(Self { db })
    }

    /// Store a node under its id
    pub fn put(&self, node: &DagNode) -> Result<NodeId> {
        let id = node.id();
        self.db.insert(id.to_bytes(), node.raw_data().as_ref())?;
        Ok(id)
    }

    /// Store many nodes in one batch, returning how many were written
    pub fn put_all<'a>(&self, nodes: impl IntoIterator<Item = &'a DagNode>) -> Result<usize> {
        let mut batch = sled::Batch::default();
        let mut count = 0;
        for node in nodes {
            batch.insert(&node.id().to_bytes()[..], node.raw_data().as_ref());
            count += 1;
        }
        self.db.apply_batch(batch)?;
        Ok(count)
    }

    /// Stored value for `id`: node bytes or a sealed record
    pub fn raw(&self, id: &NodeId) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(id.to_bytes())?.map(|v| v.to_vec()))
    }

    pub fn contains(&self, id: &NodeId) -> Result<bool> {
        Ok(self.db.contains_key(id.to_bytes())?)
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Replace every sealed node's value with its sealed record
    pub fn record_sealed(&self, sealed: &SealedMap) -> Result<usize> {
        let mut batch = sled::Batch::default();
        for (id, block) in sealed.iter() {
            let record = SealedAggregate::from(block.clone()).to_bytes();
            batch.insert(&id.to_bytes()[..], record);
        }
        self.db.apply_batch(batch)?;

        // Flush to ensure durability
        self.db.flush()?;

        debug!("Recorded {} sealed blocks", sealed.len());
        Ok(sealed.len())
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

#[async_trait]
impl DagStore for BlockStore {
    async fn get(&self, id: &NodeId) -> std::result::Result<DagNode, DagError> {
        let value = self
            .db
            .get(id.to_bytes())
            .map_err(|e| DagError::Backend(e.to_string()))?
            .ok_or(DagError::NotFound(*id))?;

        if detect_sealed(&value).is_some() {
            return Err(DagError::Sealed(*id));
        }
        DagNode::decode(*id, value.to_vec())
    }
}
