//! Path rules for the tracked root
//!
//! Layout of the private storage area:
//! ```text
//! <root>/
//!   .aerodex/
//!     index.sqlite
//!     config.toml
//! ```

use crate::error::{CoreError, Result};
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Name of the private storage directory inside a tracked root
pub const PRIVATE_DIR: &str = ".aerodex";

/// Database file inside [`PRIVATE_DIR`]
pub const INDEX_FILE: &str = "index.sqlite";

/// Configuration file inside [`PRIVATE_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

/// Normalize a path for storage
///
/// - Converts to relative path with `/` separator
/// - Rejects `..`, roots and drive prefixes
/// - Removes `./` segments
pub fn normalize_path(path: &Path) -> Result<String> {
    let mut parts: Vec<String> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(CoreError::InvalidPath(path.to_path_buf()));
            }
        }
    }

    Ok(parts.join("/"))
}

/// Resolve `.` and `..` without touching the filesystem
///
/// `..` at the top of a rooted path stays at the root.
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    out
}

/// Relative, normalized form of `path` under `root`
///
/// Both paths must already be absolute and cleaned.
pub fn relative_to(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| CoreError::InvalidPath(path.to_path_buf()))?;
    normalize_path(rel)
}

/// Depth of a stored path: the number of `/` separators
pub fn path_depth(rel_path: &str) -> usize {
    rel_path.matches('/').count()
}

/// Check if any segment of the path is the private storage directory
pub fn is_private(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == PRIVATE_DIR))
}

/// Modification time in whole seconds since the Unix epoch
///
/// Times before the epoch come back negative.
pub fn modified_secs(metadata: &Metadata, path: &Path) -> Result<i64> {
    let modified = metadata.modified().map_err(|e| CoreError::io(path, e))?;

    Ok(match modified.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    })
}
