//! Per-index configuration stored in `.aerodex/config.toml`

use crate::error::{IndexError, Result};
use aerodex_core::hash::DEFAULT_MMAP_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MAX_SCAN_DEPTH: usize = 4096;

/// Keys understood by [`IndexConfig::get`] and [`IndexConfig::set`]
pub const CONFIG_KEYS: &[&str] = &[
    "scan.max_depth",
    "scan.follow_links",
    "hash.enabled",
    "hash.mmap_threshold",
];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub scan: ScanConfig,
    pub hash: HashConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory recursion limit below each requested path (0 = unlimited)
    pub max_depth: usize,
    /// Descend into symlinked directories
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            follow_links: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// Compute content hashes for new and changed files
    pub enabled: bool,
    /// Files at or above this many bytes are hashed via mmap
    pub mmap_threshold: u64,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
        }
    }
}

impl IndexConfig {
    /// Load from a file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(IndexError::io(path, e)),
        };

        let config: Self = toml::from_str(&text)
            .map_err(|e| IndexError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let text = toml::to_string_pretty(self).map_err(|e| IndexError::Config(e.to_string()))?;
        std::fs::write(path, text).map_err(|e| IndexError::io(path, e))
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "scan.max_depth" => self.scan.max_depth.to_string(),
            "scan.follow_links" => self.scan.follow_links.to_string(),
            "hash.enabled" => self.hash.enabled.to_string(),
            "hash.mmap_threshold" => self.hash.mmap_threshold.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Parse and assign one value; the config is left untouched on error
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.clone();
        match key {
            "scan.max_depth" => next.scan.max_depth = parse_value(key, value)?,
            "scan.follow_links" => next.scan.follow_links = parse_value(key, value)?,
            "hash.enabled" => next.hash.enabled = parse_value(key, value)?,
            "hash.mmap_threshold" => next.hash.mmap_threshold = parse_value(key, value)?,
            _ => return Err(unknown_key(key)),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.max_depth > MAX_SCAN_DEPTH {
            return Err(IndexError::Config(format!(
                "scan.max_depth must be at most {} (got {})",
                MAX_SCAN_DEPTH, self.scan.max_depth
            )));
        }
        if self.hash.mmap_threshold == 0 {
            return Err(IndexError::Config(
                "hash.mmap_threshold must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> IndexError {
    IndexError::Config(format!(
        "Unknown config key: {} (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| IndexError::Config(format!("Invalid value for {}: {} ({})", key, value, e)))
}
