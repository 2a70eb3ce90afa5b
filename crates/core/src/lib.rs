//! Core types for aerodex
//!
//! - Entry data model and artifact kinds
//! - Point / footprint geometries (EWKT, SRID 4326)
//! - BLAKE3 content fingerprints
//! - Path normalization and private-directory rules

pub mod entry;
pub mod error;
pub mod geo;
pub mod hash;
pub mod path;

pub use entry::{Entry, EntryType};
pub use error::{CoreError, Result};
pub use geo::{Point, Polygon};
pub use hash::{fingerprint_file, hash_bytes, ContentHash};
