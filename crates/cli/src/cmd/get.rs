//! Write a node's original bytes to stdout

use crate::util;
use anyhow::{Context, Result};
use bytes::Bytes;
use dagseal_sealer::PassthroughReader;
use std::io::Write;
use std::path::Path;

pub async fn run(store_dir: &Path, config_path: &Path, id: &str) -> Result<()> {
    let id = util::parse_id(id)?;
    let store = util::open_store(store_dir)?;
    let stored = util::stored_value(&store, &id)?;

    let config = util::load_config(config_path)?;
    let reader = PassthroughReader::new(util::sealing_client(&config)?);
    let original = reader
        .read(Bytes::from(stored))
        .await
        .with_context(|| format!("Failed to read {}", id))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&original)?;
    stdout.flush()?;
    Ok(())
}
