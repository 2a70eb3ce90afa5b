//! Refresh the index against the filesystem

use crate::util::{open_index, print_report};
use aerodex_index::SyncEngine;
use anyhow::Result;

pub fn run() -> Result<()> {
    let mut db = open_index()?;
    let report = SyncEngine::new(&mut db).sync()?;
    print_report(&report)
}
