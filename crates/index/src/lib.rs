//! Index synchronization engine for aerial imagery datasets
//!
//! - Path resolution under a tracked root
//! - Fingerprint-based change detection (mtime, then BLAKE3)
//! - Entry classification with camera/geo enrichment
//! - SQLite entry store with transactional add/remove/sync
//!
//! Call [`initialize`] once before opening or creating an index.

pub mod classify;
pub mod config;
pub mod context;
pub mod db;
pub mod detect;
pub mod error;
pub mod report;
pub mod resolve;
pub mod sync;

pub use classify::{Classifier, EntryParser, ParseEntryOpts};
pub use config::{HashConfig, IndexConfig, ScanConfig, CONFIG_KEYS};
pub use context::{initialize, is_initialized, shutdown, EngineInfo};
pub use db::{Database, Fingerprint, IndexTx};
pub use detect::{needs_update, Detection};
pub use error::{IndexError, Result};
pub use report::{Change, ChangeReport, Op};
pub use resolve::PathResolver;
pub use sync::SyncEngine;
