//! Filesystem import
//!
//! Files become chunk leaves under a link node with an empty payload; a file
//! that fits in one chunk is a single leaf. Directories become link nodes whose
//! payload is the newline-joined entry names, links in the same sorted order.

use crate::blocks::BlockStore;
use crate::Result;
use anyhow::Context;
use bytes::Bytes;
use dagseal_core::{DagNode, NodeId};
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Leaf chunk size for imported files
pub const CHUNK_SIZE: usize = 256 * 1024;

/// Import a file or directory tree, returning the root id
pub fn import_path(store: &BlockStore, path: &Path) -> Result<NodeId> {
    let meta = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    let root = if meta.is_dir() {
        import_dir(store, path)?
    } else {
        import_file(store, path)?
    };
    store.flush()?;
    info!("Imported {} as {}", path.display(), root);
    Ok(root)
}

/// Chunk `data` into the store, returning the file node id
pub fn import_bytes(store: &BlockStore, data: impl Into<Bytes>) -> Result<NodeId> {
    let data = data.into();
    if data.len() <= CHUNK_SIZE {
        return store.put(&DagNode::leaf(data));
    }

    let chunks: Vec<DagNode> = (0..data.len())
        .step_by(CHUNK_SIZE)
        .map(|start| DagNode::leaf(data.slice(start..(start + CHUNK_SIZE).min(data.len()))))
        .collect();
    store.put_all(&chunks)?;

    store.put(&DagNode::branch(chunks.iter().map(DagNode::id), b""))
}

fn import_file(store: &BlockStore, path: &Path) -> Result<NodeId> {
    let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    debug!("Importing {} ({} bytes)", path.display(), data.len());
    import_bytes(store, data)
}

fn import_dir(store: &BlockStore, path: &Path) -> Result<NodeId> {
    let mut names = Vec::new();
    let mut links = Vec::new();

    for entry in WalkDir::new(path).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("list {}", path.display()))?;
        let file_type = entry.file_type();
        let id = if file_type.is_dir() {
            import_dir(store, entry.path())?
        } else if file_type.is_file() {
            import_file(store, entry.path())?
        } else {
            debug!("Skipping {}", entry.path().display());
            continue;
        };
        names.push(entry.file_name().to_string_lossy().into_owned());
        links.push(id);
    }

    store.put(&DagNode::branch(links, names.join("\n").as_bytes()))
}
