use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Some paths are not contained within {root}: {path}")]
    OutsideRoot { root: PathBuf, path: PathBuf },

    #[error("Path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Table 'entries' not found (not a valid index: {0})")]
    MissingTable(PathBuf),

    #[error("Cannot initialize index: {0} already exists")]
    AlreadyExists(PathBuf),

    #[error("Not an aerodex directory, .aerodex does not exist in {0} (did you run init?)")]
    NotAnIndex(PathBuf),

    #[error("aerodex::initialize() must be called before opening an index")]
    NotInitialized,

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] aerodex_core::CoreError),

    #[error(transparent)]
    Camera(#[from] aerodex_camera::CameraError),
}

impl IndexError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Maps a missing-file I/O error to [`IndexError::NotFound`]
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}
