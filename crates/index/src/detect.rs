//! Fingerprint comparison between a stored entry and the live filesystem

use crate::error::{IndexError, Result};
use aerodex_core::fingerprint_file;
use aerodex_core::path::modified_secs;
use std::path::Path;
use tracing::debug;

/// Outcome of a change check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub changed: bool,
    /// Live modification time
    pub mtime: i64,
    /// Recomputed hash; `None` when no hash was needed
    pub hash: Option<String>,
}

/// Decide whether a tracked path needs to be recomputed
///
/// An identical mtime short-circuits without hashing. A differing mtime on
/// a directory is always a change. A differing mtime on a file is a change
/// only if the content hash differs too; the caller must leave the stored
/// mtime untouched when it is not.
pub fn needs_update(
    stored_mtime: i64,
    stored_hash: &str,
    path: &Path,
    mmap_threshold: u64,
) -> Result<Detection> {
    let metadata = std::fs::metadata(path).map_err(|e| IndexError::from_io(path, e))?;
    let mtime = modified_secs(&metadata, path)?;

    if mtime == stored_mtime {
        return Ok(Detection {
            changed: false,
            mtime,
            hash: None,
        });
    }

    debug!(
        "{} modified time ({}) differs from file value: {}",
        path.display(),
        stored_mtime,
        mtime
    );

    if metadata.is_dir() {
        return Ok(Detection {
            changed: true,
            mtime,
            hash: None,
        });
    }

    let hash = fingerprint_file(path, mmap_threshold)?.to_hex();
    let changed = hash != stored_hash;
    if changed {
        debug!(
            "{} hash differs (old: {} | new: {})",
            path.display(),
            stored_hash,
            hash
        );
    }

    Ok(Detection {
        changed,
        mtime,
        hash: Some(hash),
    })
}
