//! Create an index in a directory

use aerodex_index::Database;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn run(directory: Option<PathBuf>) -> Result<()> {
    let directory = directory.unwrap_or_else(|| PathBuf::from("."));
    let db = Database::create(&directory)?;

    println!(
        "{} {}",
        "Initialized empty index in".green(),
        db.private_dir().display()
    );
    Ok(())
}
