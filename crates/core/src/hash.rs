//! BLAKE3 content fingerprints for indexed files

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Files at or above this size are hashed through a memory map
pub const DEFAULT_MMAP_THRESHOLD: u64 = 4 * 1024 * 1024;

/// A 256-bit content hash
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, the form stored in the index
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 64 character hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != 64 {
            return Err(CoreError::InvalidHash(format!(
                "expected 64 characters, got {}",
                s.len()
            )));
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| CoreError::InvalidHash(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Hash bytes using BLAKE3
pub fn hash_bytes(data: &[u8]) -> ContentHash {
    ContentHash::from_bytes(*blake3::hash(data).as_bytes())
}

/// Hash a file using BLAKE3 (streaming)
pub fn hash_file(path: &Path) -> Result<ContentHash> {
    let file = File::open(path).map_err(|e| CoreError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = blake3::Hasher::new();

    let mut buffer = [0u8; 64 * 1024];
    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| CoreError::io(path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(ContentHash::from_bytes(*hasher.finalize().as_bytes()))
}

/// Hash a file using memory-mapped I/O (large files)
pub fn hash_file_mmap(path: &Path) -> Result<ContentHash> {
    use memmap2::Mmap;

    let file = File::open(path).map_err(|e| CoreError::io(path, e))?;
    // SAFETY: the map is read-only and dropped before returning. A concurrent
    // writer can change the bytes under us, which only yields a stale hash.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| CoreError::io(path, e))?;
    Ok(ContentHash::from_bytes(*blake3::hash(&mmap).as_bytes()))
}

/// Pick streaming or mmap hashing by file size
///
/// Empty files always stream.
pub fn fingerprint_file(path: &Path, mmap_threshold: u64) -> Result<ContentHash> {
    let len = std::fs::metadata(path)
        .map_err(|e| CoreError::io(path, e))?
        .len();

    if len > 0 && len >= mmap_threshold {
        hash_file_mmap(path)
    } else {
        hash_file(path)
    }
}
