//! List indexed entries

use crate::util::open_index;
use anyhow::Result;
use std::io::Write;

pub fn run(prefix: Option<&str>, depth: Option<usize>) -> Result<()> {
    let db = open_index()?;
    let entries = db.list(prefix, depth)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for entry in &entries {
        writeln!(out, "{}\t{}", entry.entry_type, entry.path)?;
    }
    out.flush()?;
    Ok(())
}
