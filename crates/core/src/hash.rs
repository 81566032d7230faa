//! BLAKE3 node identifiers for content-addressed DAGs

use crate::error::DagError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Encoding of the bytes a [`NodeId`] addresses
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Codec {
    /// Leaf payload, no link table
    Raw,
    /// Node carrying an ordered link table ahead of its payload
    Dag,
}

impl Codec {
    const RAW_TAG: u8 = 0x55;
    const DAG_TAG: u8 = 0x71;

    /// Single-byte tag used in binary encodings
    pub const fn tag(self) -> u8 {
        match self {
            Codec::Raw => Self::RAW_TAG,
            Codec::Dag => Self::DAG_TAG,
        }
    }

    /// Decode a tag written by [`Codec::tag`]
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            Self::RAW_TAG => Some(Codec::Raw),
            Self::DAG_TAG => Some(Codec::Dag),
            _ => None,
        }
    }

    /// Prefix used in the text form
    pub const fn prefix(self) -> &'static str {
        match self {
            Codec::Raw => "raw",
            Codec::Dag => "dag",
        }
    }
}

/// Content-derived identifier of a DAG node
///
/// Identical encoded bytes under the same codec always yield the same id.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId {
    codec: Codec,
    digest: [u8; 32],
}

impl NodeId {
    /// Length of [`NodeId::to_bytes`]
    pub const ENCODED_LEN: usize = 33;

    /// Create an id from a codec and a precomputed digest
    pub const fn from_digest(codec: Codec, digest: [u8; 32]) -> Self {
        Self { codec, digest }
    }

    /// Address `data` under `codec`
    pub fn of(codec: Codec, data: &[u8]) -> Self {
        Self::from_digest(codec, *blake3::hash(data).as_bytes())
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Get the digest as a byte slice
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Binary form: codec tag followed by the digest
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0] = self.codec.tag();
        out[1..].copy_from_slice(&self.digest);
        out
    }

    /// Parse the binary form written by [`NodeId::to_bytes`]
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DagError> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(DagError::InvalidId(format!(
                "expected {} bytes, got {}",
                Self::ENCODED_LEN,
                bytes.len()
            )));
        }
        let codec = Codec::from_tag(bytes[0])
            .ok_or_else(|| DagError::InvalidId(format!("unknown codec tag 0x{:02x}", bytes[0])))?;
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&bytes[1..]);
        Ok(Self { codec, digest })
    }

    /// Convert the digest to lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

impl FromStr for NodeId {
    type Err = DagError;

    /// Parse `raw-<hex>` / `dag-<hex>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, hex_part) = s
            .split_once('-')
            .ok_or_else(|| DagError::InvalidId(format!("missing codec prefix: {s}")))?;

        let codec = match prefix {
            "raw" => Codec::Raw,
            "dag" => Codec::Dag,
            other => return Err(DagError::InvalidId(format!("unknown codec prefix: {other}"))),
        };

        if hex_part.len() != 64 {
            return Err(DagError::InvalidId(format!(
                "invalid hex length: expected 64 characters, got {}",
                hex_part.len()
            )));
        }

        let mut digest = [0u8; 32];
        hex::decode_to_slice(hex_part, &mut digest)
            .map_err(|e| DagError::InvalidId(format!("{s}: {e}")))?;
        Ok(Self { codec, digest })
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({self})")
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.codec.prefix(), self.to_hex())
    }
}
