//! Scratch datasets for workflow tests

use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::{Path, PathBuf};

/// Temporary tracked root that is removed on drop
pub struct Dataset {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl Dataset {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a file with a fixed modification time
    pub fn write(&self, rel: &str, content: &[u8], mtime: i64) -> PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        set_file_mtime(&path, FileTime::from_unix_time(mtime, 0)).unwrap();
        path
    }

    pub fn touch(&self, rel: &str, mtime: i64) {
        set_file_mtime(self.root.join(rel), FileTime::from_unix_time(mtime, 0)).unwrap();
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.root.join(rel)).unwrap();
    }
}
