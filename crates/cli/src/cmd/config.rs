//! Configuration display command

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(config_path: &Path, example: bool) -> Result<()> {
    if example {
        print!("{}", dagseal_sealer::config::example_config());
        return Ok(());
    }

    let config = util::load_config(config_path)?;
    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", config_path.display())
    };

    eprintln!("{}: {}", "Location".dimmed(), source.dimmed());
    print!("{}", config.to_toml()?);
    Ok(())
}
