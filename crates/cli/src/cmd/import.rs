//! Import a file or directory into the block store

use crate::util;
use anyhow::Result;
use std::path::Path;

pub async fn run(store_dir: &Path, path: &Path) -> Result<()> {
    let store = util::open_store(store_dir)?;
    let root = dagseal_store::import_path(&store, path)?;

    // Bare id on stdout so it can be captured by scripts
    println!("{}", root);
    Ok(())
}
