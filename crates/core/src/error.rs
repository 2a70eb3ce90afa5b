use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Invalid path {0}: must be relative and stay inside the root")]
    InvalidPath(PathBuf),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Unknown entry type: {0}")]
    UnknownEntryType(i64),
}

impl CoreError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
