//! Passthrough reads of persisted values
//!
//! A stored value is either raw content or a sealed record written in its
//! place. Raw content is returned untouched; sealed records are resolved
//! through the sealing service.

use crate::client::SealingClient;
use crate::error::SealError;
use crate::Result;
use bytes::Bytes;
use dagseal_core::detect_sealed;
use std::sync::Arc;
use tracing::debug;

/// Materializes original bytes from stored values
#[derive(Clone)]
pub struct PassthroughReader {
    client: Arc<dyn SealingClient>,
}

impl PassthroughReader {
    pub fn new(client: Arc<dyn SealingClient>) -> Self {
        Self { client }
    }

    /// Original bytes behind a stored value
    ///
    /// Fails with [`SealError::NotFound`] when the value is a sealed record
    /// but the service no longer has the block.
    pub async fn read(&self, stored: Bytes) -> Result<Bytes> {
        let Some(record) = detect_sealed(&stored) else {
            return Ok(stored);
        };
        let Some(block) = record.first() else {
            return Ok(stored);
        };

        debug!("Unsealing {} ({} bytes)", block.location(), block.size());
        self.client
            .retrieve(block.location())
            .await?
            .ok_or_else(|| SealError::NotFound {
                location: block.location().to_string(),
            })
    }

    /// See [`size_of`]
    pub fn size_of(&self, stored: &[u8]) -> u64 {
        size_of(stored)
    }
}

/// Original size of a stored value, without touching the network
///
/// Sealed records report their first block's recorded size; anything else
/// is its own length.
pub fn size_of(stored: &[u8]) -> u64 {
    detect_sealed(stored)
        .and_then(|record| record.first().map(|block| block.size()))
        .unwrap_or(stored.len() as u64)
}
