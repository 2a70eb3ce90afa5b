//! Process-wide engine lifecycle
//!
//! `initialize()` must run before any index is created or opened. Repeated
//! calls are no-ops, as are `shutdown()` calls without a prior initialize.

use crate::error::{IndexError, Result};
use parking_lot::Mutex;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    /// aerodex version
    pub version: &'static str,
    /// Linked SQLite library version
    pub sqlite_version: &'static str,
}

static CONTEXT: Mutex<Option<EngineInfo>> = parking_lot::const_mutex(None);

pub fn initialize() -> EngineInfo {
    let mut ctx = CONTEXT.lock();
    if let Some(info) = ctx.as_ref() {
        debug!("Engine already initialized");
        return info.clone();
    }

    let info = EngineInfo {
        version: env!("CARGO_PKG_VERSION"),
        sqlite_version: rusqlite::version(),
    };
    info!(
        "aerodex {} initialized (SQLite {})",
        info.version, info.sqlite_version
    );

    *ctx = Some(info.clone());
    info
}

pub fn shutdown() {
    if CONTEXT.lock().take().is_some() {
        debug!("Engine shut down");
    }
}

pub fn is_initialized() -> bool {
    CONTEXT.lock().is_some()
}

pub(crate) fn ensure_initialized() -> Result<()> {
    if is_initialized() {
        Ok(())
    } else {
        Err(IndexError::NotInitialized)
    }
}
