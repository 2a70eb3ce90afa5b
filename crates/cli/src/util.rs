//! Shared helpers for CLI commands

use aerodex_index::{ChangeReport, Database};
use anyhow::{Context, Result};
use std::io::Write;

/// Open the index containing the current directory
pub fn open_index() -> Result<Database> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let db = Database::open(&cwd, true)?;
    tracing::debug!("Using index at {}", db.root().display());
    Ok(db)
}

/// Write the change log to stdout, one `op\tpath` line per change
pub fn print_report(report: &ChangeReport) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for change in report {
        writeln!(out, "{}", change)?;
    }
    out.flush()?;
    Ok(())
}
