//! Sealed-record model
//!
//! A sealed block is the location handle the sealing service hands back for
//! one block, plus the length of the original payload. Aggregates of sealed
//! blocks are what gets persisted in place of raw block bytes, so they must be
//! recognisable on their own: [`detect_sealed`] classifies arbitrary stored
//! blobs without any side channel.

use crate::hash::NodeId;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// One sealed block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SealedBlock {
    /// Opaque location handle returned by the sealing service
    #[serde(rename = "path")]
    location: String,
    /// Length of the original payload
    size: u64,
}

impl SealedBlock {
    pub fn new(location: impl Into<String>, size: u64) -> Self {
        Self {
            location: location.into(),
            size,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Ordered sequence of sealed blocks
///
/// Wire form: `{"sbs":[{"path":"...","size":N}, ...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SealedAggregate {
    #[serde(rename = "sbs")]
    blocks: Vec<SealedBlock>,
}

impl SealedAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block
    pub fn push(&mut self, block: SealedBlock) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// Concatenate `a` and `b`, `a`'s blocks first; no deduplication
    pub fn merge(a: &SealedAggregate, b: &SealedAggregate) -> SealedAggregate {
        let mut blocks = Vec::with_capacity(a.blocks.len() + b.blocks.len());
        blocks.extend_from_slice(&a.blocks);
        blocks.extend_from_slice(&b.blocks);
        SealedAggregate { blocks }
    }

    pub fn first(&self) -> Option<&SealedBlock> {
        self.blocks.first()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Deterministic serialized form
    pub fn to_bytes(&self) -> Vec<u8> {
        // Two plain fields; serde_json cannot fail on this shape.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Whether this record carries usable sealed-block data
    fn is_meaningful(&self) -> bool {
        !self.blocks.is_empty() && self.blocks.iter().all(|b| !b.location.is_empty())
    }
}

impl From<SealedBlock> for SealedAggregate {
    fn from(block: SealedBlock) -> Self {
        Self {
            blocks: vec![block],
        }
    }
}

impl FromIterator<SealedBlock> for SealedAggregate {
    fn from_iter<I: IntoIterator<Item = SealedBlock>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

/// Try to interpret a stored value as a sealed aggregate
///
/// Returns `None` on any parse failure, and also when the value parses but
/// carries no sealed-block data (no blocks, or a block without a location).
pub fn detect_sealed(value: &[u8]) -> Option<SealedAggregate> {
    serde_json::from_slice::<SealedAggregate>(value)
        .ok()
        .filter(SealedAggregate::is_meaningful)
}

/// Sealed blocks of one orchestration, keyed by node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SealedMap {
    entries: AHashMap<NodeId, SealedBlock>,
}

impl SealedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sealed node; returns the previous record if it was sealed twice
    pub fn insert(&mut self, id: NodeId, block: SealedBlock) -> Option<SealedBlock> {
        self.entries.insert(id, block)
    }

    pub fn get(&self, id: &NodeId) -> Option<&SealedBlock> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &SealedBlock)> {
        self.entries.iter()
    }

    /// Total original bytes covered by the map
    pub fn total_size(&self) -> u64 {
        self.entries.values().map(SealedBlock::size).sum()
    }
}

impl IntoIterator for SealedMap {
    type Item = (NodeId, SealedBlock);
    type IntoIter = std::collections::hash_map::IntoIter<NodeId, SealedBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
