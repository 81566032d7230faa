//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use dagseal_core::NodeId;
use dagseal_sealer::{HttpSealingClient, SealerConfig};
use dagseal_store::BlockStore;
use std::path::Path;
use std::sync::Arc;

/// Open the block store, creating it on first use
pub fn open_store(dir: &Path) -> Result<BlockStore> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create store directory {}", dir.display()))?;
    BlockStore::open(dir)
}

/// Load configuration; a missing file yields the defaults
pub fn load_config(path: &Path) -> Result<SealerConfig> {
    SealerConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))
}

/// Parse a node id argument
pub fn parse_id(text: &str) -> Result<NodeId> {
    text.parse()
        .with_context(|| format!("Invalid node id '{}' (expected raw-<hex> or dag-<hex>)", text))
}

/// HTTP sealing client for the configured service
pub fn sealing_client(config: &SealerConfig) -> Result<Arc<HttpSealingClient>> {
    let client = HttpSealingClient::from_config(config).context("Failed to build sealing service client")?;
    Ok(Arc::new(client))
}

/// Stored value for `id`, or an error naming the missing node
pub fn stored_value(store: &BlockStore, id: &NodeId) -> Result<Vec<u8>> {
    store
        .raw(id)?
        .with_context(|| format!("Node not found: {}", id))
}
