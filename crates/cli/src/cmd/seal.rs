//! Seal a DAG and persist the sealed records

use crate::util;
use anyhow::{Context, Result};
use dagseal_sealer::{Orchestrator, SealStatus};
use owo_colors::OwoColorize;
use std::path::Path;
use tracing::info;

pub async fn run(store_dir: &Path, config_path: &Path, id: &str) -> Result<()> {
    let root = util::parse_id(id)?;
    let config = util::load_config(config_path)?;
    let store = util::open_store(store_dir)?;

    let orchestrator = Orchestrator::from_config(&config, util::sealing_client(&config)?)?;
    info!("Sealing service at {}, capacity {}", config.endpoint, orchestrator.capacity());

    let status = orchestrator
        .seal(&root, &store)
        .await
        .with_context(|| format!("Failed to seal {}", root))?;

    match status {
        SealStatus::NotNeeded => {
            println!("{} {} is an excluded placeholder", "Not needed:".yellow(), root);
        }
        SealStatus::Sealed(sealed) => {
            let total = sealed.total_size();
            let count = store.record_sealed(&sealed)?;
            println!("{} {} nodes ({} bytes)", "Sealed".green().bold(), count, total);
        }
        SealStatus::Rejected { node, message } => {
            println!("{} {}: {}", "Rejected".red().bold(), node, message);
            println!("{}", "Nothing was recorded; the DAG is unchanged".dimmed());
        }
    }

    Ok(())
}
