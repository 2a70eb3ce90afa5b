//! Entry classifier: turns one filesystem object into a populated [`Entry`]

use crate::error::{IndexError, Result};
use aerodex_camera::{ExifReader, Parser};
use aerodex_core::hash::DEFAULT_MMAP_THRESHOLD;
use aerodex_core::path::{modified_secs, path_depth, relative_to};
use aerodex_core::{fingerprint_file, Entry, EntryType, Point};
use serde_json::json;
use std::path::Path;
use tracing::{debug, warn};

const EXIF_EXTENSIONS: &[&str] = &["jpg", "jpeg", "tif", "tiff", "dng"];
const PLAIN_IMAGE_EXTENSIONS: &[&str] = &["png"];
const POINT_CLOUD_EXTENSIONS: &[&str] = &["las", "laz", "ply"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseEntryOpts {
    /// Compute the content hash of files
    pub with_hash: bool,
    pub mmap_threshold: u64,
}

impl Default for ParseEntryOpts {
    fn default() -> Self {
        Self {
            with_hash: true,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
        }
    }
}

/// Produces a complete entry for a path under `root`
pub trait Classifier {
    fn classify(&self, path: &Path, root: &Path, opts: &ParseEntryOpts) -> Result<Entry>;
}

/// Extension-based classifier with EXIF camera/geo enrichment
#[derive(Debug, Default, Clone, Copy)]
pub struct EntryParser;

impl Classifier for EntryParser {
    fn classify(&self, path: &Path, root: &Path, opts: &ParseEntryOpts) -> Result<Entry> {
        let metadata = std::fs::metadata(path).map_err(|e| IndexError::from_io(path, e))?;
        let rel = relative_to(root, path)?;

        let mut entry = Entry {
            depth: path_depth(&rel),
            path: rel,
            mtime: modified_secs(&metadata, path)?,
            meta: json!({}),
            ..Default::default()
        };

        if metadata.is_dir() {
            entry.entry_type = EntryType::Directory;
            return Ok(entry);
        }

        entry.size = metadata.len();
        if opts.with_hash {
            entry.hash = fingerprint_file(path, opts.mmap_threshold)?.to_hex();
        }

        let ext = extension(path);
        if EXIF_EXTENSIONS.contains(&ext.as_str()) {
            parse_camera_image(path, &mut entry)?;
        } else if PLAIN_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            entry.entry_type = EntryType::Image;
        } else if POINT_CLOUD_EXTENSIONS.contains(&ext.as_str()) {
            entry.entry_type = EntryType::PointCloud;
        } else {
            entry.entry_type = EntryType::Generic;
        }

        debug!("Classified {} as {}", entry.path, entry.entry_type);
        Ok(entry)
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn parse_camera_image(path: &Path, entry: &mut Entry) -> Result<()> {
    entry.entry_type = EntryType::Image;

    let tags = match ExifReader::from_path(path) {
        Ok(Some(tags)) => tags,
        Ok(None) => return Ok(()),
        Err(e) => {
            warn!("Cannot read EXIF from {}: {}", path.display(), e);
            return Ok(());
        }
    };

    let camera = Parser::new(&tags).extract();
    entry.meta = serde_json::to_value(&camera)?;

    if let Some(loc) = camera.location {
        entry.entry_type = EntryType::GeoImage;
        entry.point_geom = Some(Point::new(
            loc.longitude,
            loc.latitude,
            loc.altitude.unwrap_or(0.0),
        ));
    }

    Ok(())
}
