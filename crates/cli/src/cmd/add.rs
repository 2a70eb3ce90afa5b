//! Add paths to the index

use crate::util::{open_index, print_report};
use aerodex_index::SyncEngine;
use anyhow::Result;
use std::path::PathBuf;

pub fn run(paths: &[PathBuf]) -> Result<()> {
    let mut db = open_index()?;
    let report = SyncEngine::new(&mut db).add(paths)?;
    print_report(&report)
}
