//! Index entry representation

use crate::error::{CoreError, Result};
use crate::geo::{Point, Polygon};
use serde::{Deserialize, Serialize};

/// Kind of indexed artifact
///
/// The discriminants are what the index stores, so they must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Undefined = 0,
    Directory = 1,
    Generic = 2,
    /// Image with embedded geolocation
    GeoImage = 3,
    /// Georeferenced raster (orthophoto, DEM)
    GeoRaster = 4,
    PointCloud = 5,
    Image = 6,
}

impl EntryType {
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    pub fn from_i64(value: i64) -> Result<Self> {
        Ok(match value {
            0 => Self::Undefined,
            1 => Self::Directory,
            2 => Self::Generic,
            3 => Self::GeoImage,
            4 => Self::GeoRaster,
            5 => Self::PointCloud,
            6 => Self::Image,
            other => return Err(CoreError::UnknownEntryType(other)),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Directory => "directory",
            Self::Generic => "generic",
            Self::GeoImage => "geoimage",
            Self::GeoRaster => "georaster",
            Self::PointCloud => "pointcloud",
            Self::Image => "image",
        }
    }
}

impl Default for EntryType {
    fn default() -> Self {
        Self::Undefined
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked filesystem object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entry {
    /// Relative to the tracked root, `/` separated
    pub path: String,
    /// Hex content hash; empty for directories or when hashing was skipped
    pub hash: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// Extracted metadata document
    pub meta: serde_json::Value,
    /// Seconds since the Unix epoch, as observed when the entry was computed
    pub mtime: i64,
    pub size: u64,
    /// Number of `/` separators in `path`
    pub depth: usize,
    pub point_geom: Option<Point>,
    pub polygon_geom: Option<Polygon>,
}

impl Entry {
    pub fn is_directory(&self) -> bool {
        self.entry_type == EntryType::Directory
    }
}
