//! Report a node's original size

use crate::util;
use anyhow::Result;
use std::path::Path;

pub async fn run(store_dir: &Path, id: &str) -> Result<()> {
    let id = util::parse_id(id)?;
    let store = util::open_store(store_dir)?;
    let stored = util::stored_value(&store, &id)?;

    println!("{}", dagseal_sealer::size_of(&stored));
    Ok(())
}
