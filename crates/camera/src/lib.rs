//! Camera and geolocation metadata for aerial imagery
//!
//! - Tag model keyed by `Exif.<group>.<Name>`
//! - EXIF container reader (kamadak-exif)
//! - Normalized camera identity, sensor width, 35mm-equivalent focal length
//! - Decimal-degree geolocation

pub mod error;
pub mod extract;
pub mod reader;
pub mod sensors;
pub mod tags;

pub use error::{CameraError, Result};
pub use extract::{CameraMetadata, Focal, GeoLocation, ImageSize, Parser};
pub use reader::ExifReader;
pub use tags::{Rational, TagMap, TagSource, TagValue};
