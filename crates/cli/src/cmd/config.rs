//! Index configuration commands

use crate::util::open_index;
use aerodex_core::path::CONFIG_FILE;
use aerodex_index::{IndexConfig, CONFIG_KEYS};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

/// Print every configuration value
pub fn run_list() -> Result<()> {
    let db = open_index()?;
    let config = db.config();
    let config_path = db.private_dir().join(CONFIG_FILE);

    println!("{}", "Index Configuration".bold());
    println!("{}: {}\n", "Location".dimmed(), config_path.display().dimmed());

    let mut section = "";
    for &key in CONFIG_KEYS {
        let (group, name) = key.split_once('.').unwrap_or(("", key));
        if group != section {
            println!("{}", format!("[{}]", group).yellow());
            section = group;
        }
        println!("  {} = {}", name.cyan(), config.get(key)?);
    }

    Ok(())
}

pub fn run_get(key: &str) -> Result<()> {
    let db = open_index()?;
    println!("{}", db.config().get(key)?);
    Ok(())
}

/// Set a configuration value and write it back
pub fn run_set(key: &str, value: &str) -> Result<()> {
    let db = open_index()?;
    let config_path = db.private_dir().join(CONFIG_FILE);

    let mut config: IndexConfig = db.config().clone();
    config.set(key, value)?;
    config
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("{} {} = {}", "✓".green(), key.cyan(), config.get(key)?);
    Ok(())
}
