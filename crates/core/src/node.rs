//! DAG node representation and block encoding

use crate::error::DagError;
use crate::hash::{Codec, NodeId};
use bytes::{BufMut, Bytes, BytesMut};
use smallvec::SmallVec;

/// A node of a content-addressed DAG
///
/// Links are kept in a SmallVec since most nodes have only a handful of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DagNode {
    id: NodeId,
    /// Full encoded block (what is addressed, stored and sealed)
    raw: Bytes,
    /// Ordered child links
    links: SmallVec<[NodeId; 8]>,
    /// Offset of the payload inside `raw`
    payload_offset: usize,
}

impl DagNode {
    /// Magic bytes heading a `Dag` block
    pub const MAGIC: [u8; 4] = *b"DAG1";

    const LINK_LEN: usize = NodeId::ENCODED_LEN;
    const HEADER_LEN: usize = 4 + 4;

    /// Create a leaf node; the block is the payload itself
    pub fn leaf(payload: impl Into<Bytes>) -> Self {
        let raw = payload.into();
        Self {
            id: NodeId::of(Codec::Raw, &raw),
            raw,
            links: SmallVec::new(),
            payload_offset: 0,
        }
    }

    /// Create a node with an ordered link table
    ///
    /// Format:
    /// - magic: "DAG1" (4 bytes)
    /// - link_count: u32 LE
    /// - links: link_count x (codec tag u8 + digest [u8; 32])
    /// - payload: remaining bytes
    pub fn branch(links: impl IntoIterator<Item = NodeId>, payload: &[u8]) -> Self {
        let links: SmallVec<[NodeId; 8]> = links.into_iter().collect();
        let payload_offset = Self::HEADER_LEN + links.len() * Self::LINK_LEN;

        let mut buf = BytesMut::with_capacity(payload_offset + payload.len());
        buf.put_slice(&Self::MAGIC);
        buf.put_u32_le(links.len() as u32);
        for link in &links {
            buf.put_slice(&link.to_bytes());
        }
        buf.put_slice(payload);

        let raw = buf.freeze();
        Self {
            id: NodeId::of(Codec::Dag, &raw),
            raw,
            links,
            payload_offset,
        }
    }

    /// Decode a stored block, verifying that it hashes to `id`
    pub fn decode(id: NodeId, raw: impl Into<Bytes>) -> Result<Self, DagError> {
        let raw = raw.into();
        if NodeId::of(id.codec(), &raw) != id {
            return Err(DagError::Corrupt {
                id,
                reason: "content does not match digest".to_string(),
            });
        }

        match id.codec() {
            Codec::Raw => Ok(Self {
                id,
                raw,
                links: SmallVec::new(),
                payload_offset: 0,
            }),
            Codec::Dag => {
                let corrupt = |reason: &str| DagError::Corrupt {
                    id,
                    reason: reason.to_string(),
                };

                if raw.len() < Self::HEADER_LEN || raw[..4] != Self::MAGIC {
                    return Err(corrupt("missing DAG1 header"));
                }
                let mut count = [0u8; 4];
                count.copy_from_slice(&raw[4..8]);
                let count = u32::from_le_bytes(count) as usize;

                let payload_offset = count
                    .checked_mul(Self::LINK_LEN)
                    .and_then(|n| n.checked_add(Self::HEADER_LEN))
                    .filter(|&end| end <= raw.len())
                    .ok_or_else(|| corrupt("link table truncated"))?;

                let links = raw[Self::HEADER_LEN..payload_offset]
                    .chunks_exact(Self::LINK_LEN)
                    .map(NodeId::from_slice)
                    .collect::<Result<SmallVec<[NodeId; 8]>, _>>()
                    .map_err(|e| corrupt(&e.to_string()))?;

                Ok(Self {
                    id,
                    raw,
                    links,
                    payload_offset,
                })
            }
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Encoded block bytes; this is what gets submitted for sealing
    pub fn raw_data(&self) -> &Bytes {
        &self.raw
    }

    /// Payload without the link table
    pub fn payload(&self) -> &[u8] {
        &self.raw[self.payload_offset..]
    }

    /// Ordered child links
    pub fn links(&self) -> &[NodeId] {
        &self.links
    }

    pub fn is_leaf(&self) -> bool {
        self.links.is_empty()
    }
}
