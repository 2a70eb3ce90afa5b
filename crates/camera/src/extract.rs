//! Camera and geolocation fields derived from raw tags
//!
//! Every lookup walks an ordered list of synonym tags and degrades to a
//! default when none is present. Nothing here returns an error.

use crate::sensors;
use crate::tags::{TagSource, TagValue};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const MAKE_TAGS: &[&str] = &["Exif.Photo.LensMake", "Exif.Image.Make"];
const MODEL_TAGS: &[&str] = &["Exif.Photo.LensModel", "Exif.Image.Model"];
const WIDTH_TAGS: &[&str] = &["Exif.Photo.PixelXDimension", "Exif.Image.ImageWidth"];
const HEIGHT_TAGS: &[&str] = &["Exif.Photo.PixelYDimension", "Exif.Image.ImageLength"];
const FOCAL35_TAGS: &[&str] = &[
    "Exif.Photo.FocalLengthIn35mmFilm",
    "Exif.Image.FocalLengthIn35mmFilm",
];
const FOCAL_TAGS: &[&str] = &["Exif.Photo.FocalLength", "Exif.Image.FocalLength"];
const RES_UNIT_TAGS: &[&str] = &[
    "Exif.Photo.FocalPlaneResolutionUnit",
    "Exif.Image.FocalPlaneResolutionUnit",
];
const X_RES_TAGS: &[&str] = &[
    "Exif.Photo.FocalPlaneXResolution",
    "Exif.Image.FocalPlaneXResolution",
];
const CAPTURE_TIME_TAGS: &[&str] = &[
    "Exif.Photo.DateTimeOriginal",
    "Exif.Photo.DateTimeDigitized",
    "Exif.Image.DateTime",
];

const LATITUDE: &str = "Exif.GPSInfo.GPSLatitude";
const LATITUDE_REF: &str = "Exif.GPSInfo.GPSLatitudeRef";
const LONGITUDE: &str = "Exif.GPSInfo.GPSLongitude";
const LONGITUDE_REF: &str = "Exif.GPSInfo.GPSLongitudeRef";
const ALTITUDE: &str = "Exif.GPSInfo.GPSAltitude";

const UNKNOWN: &str = "unknown";

/// Width of a 35mm film frame
const FILM_WIDTH_MM: f64 = 36.0;

/// Image dimensions in pixels; `-1` means unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: i32,
    pub height: i32,
}

impl ImageSize {
    pub const UNKNOWN: Self = Self {
        width: -1,
        height: -1,
    };

    pub fn is_known(&self) -> bool {
        self.width >= 0 && self.height >= 0
    }
}

/// 35mm-equivalent focal length and the crop ratio it was derived from
///
/// Both are zero when they cannot be determined.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Focal {
    pub f35: f64,
    pub ratio: f64,
}

/// Decimal-degree location
///
/// Zero latitude/longitude mean "not found"; use [`Parser::has_geo`] when the
/// distinction matters. `altitude` is `None` when the tag is absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
}

/// Everything the index keeps about a camera image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraMetadata {
    pub image_width: i32,
    pub image_height: i32,
    pub make: String,
    pub model: String,
    pub sensor: String,
    pub sensor_width: f64,
    pub focal_length35: f64,
    pub focal_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_time: Option<i64>,
    #[serde(skip)]
    pub location: Option<GeoLocation>,
}

/// Metadata extractor over one file's tags
pub struct Parser<'a, S: TagSource + ?Sized> {
    tags: &'a S,
}

impl<'a, S: TagSource + ?Sized> Parser<'a, S> {
    pub fn new(tags: &'a S) -> Self {
        Self { tags }
    }

    pub fn extract_image_size(&self) -> ImageSize {
        let dimension = |keys: &[&str]| {
            self.tags
                .find(keys)
                .and_then(TagValue::to_long)
                .and_then(|v| i32::try_from(v).ok())
        };

        match (dimension(WIDTH_TAGS), dimension(HEIGHT_TAGS)) {
            (Some(width), Some(height)) => ImageSize { width, height },
            _ => ImageSize::UNKNOWN,
        }
    }

    pub fn extract_make(&self) -> String {
        self.tags
            .find(MAKE_TAGS)
            .map(TagValue::to_text)
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    pub fn extract_model(&self) -> String {
        self.tags
            .find(MODEL_TAGS)
            .map(TagValue::to_text)
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Lowercase `"<make> <model>"`, with the make stripped out of the model
    pub fn extract_sensor(&self) -> String {
        let make = self.extract_make().to_lowercase();
        let mut model = self.extract_model().to_lowercase();

        if make != UNKNOWN && !make.is_empty() {
            model = model.replace(&make, "");
        }

        format!("{} {}", make.trim(), model.trim())
    }

    /// Sensor width in mm from focal-plane resolution tags, 0 if unavailable
    pub fn extract_sensor_width(&self) -> f64 {
        let (unit, x_res) = match (self.tags.find(RES_UNIT_TAGS), self.tags.find(X_RES_TAGS)) {
            (Some(unit), Some(x_res)) => (unit, x_res),
            _ => return 0.0,
        };

        let mm_per_unit = match unit.to_long() {
            Some(unit) => mm_per_unit(unit),
            None => 0.0,
        };
        if mm_per_unit == 0.0 {
            return 0.0;
        }

        let pixels_per_unit = x_res.to_float().unwrap_or(0.0);
        if pixels_per_unit <= 0.0 {
            return 0.0;
        }

        let size = self.extract_image_size();
        if size.width < 0 {
            return 0.0;
        }

        let units_per_pixel = 1.0 / pixels_per_unit;
        size.width as f64 * units_per_pixel * mm_per_unit
    }

    pub fn compute_focal(&self) -> Focal {
        if let Some(f35) = self.tags.find(FOCAL35_TAGS).and_then(TagValue::to_float) {
            if f35 > 0.0 {
                return Focal {
                    f35,
                    ratio: f35 / FILM_WIDTH_MM,
                };
            }
        }

        let mut sensor_width = self.extract_sensor_width();
        if sensor_width == 0.0 {
            let sensor = self.extract_sensor();
            if let Some(width) = sensors::sensor_width(&sensor) {
                debug!("Using tabulated sensor width {} mm for {}", width, sensor);
                sensor_width = width;
            }
        }

        match self.tags.find(FOCAL_TAGS).and_then(TagValue::to_float) {
            Some(focal) if sensor_width > 0.0 => {
                let ratio = focal / sensor_width;
                Focal {
                    f35: FILM_WIDTH_MM * ratio,
                    ratio,
                }
            }
            _ => Focal::default(),
        }
    }

    /// True when both latitude and longitude tags exist
    pub fn has_geo(&self) -> bool {
        self.tags.contains(LATITUDE) && self.tags.contains(LONGITUDE)
    }

    pub fn extract_geo(&self) -> GeoLocation {
        GeoLocation {
            latitude: self.geo_to_decimal(LATITUDE, LATITUDE_REF),
            longitude: self.geo_to_decimal(LONGITUDE, LONGITUDE_REF),
            altitude: self
                .tags
                .get(ALTITUDE)
                .map(|v| v.rational(0).map(|r| r.to_f64()).unwrap_or(0.0)),
        }
    }

    /// Capture time in milliseconds since the epoch (camera clock, read as UTC)
    pub fn extract_capture_time(&self) -> Option<i64> {
        let raw = self.tags.find(CAPTURE_TIME_TAGS)?.to_text();
        match NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S") {
            Ok(dt) => Some(dt.and_utc().timestamp_millis()),
            Err(e) => {
                debug!("Unparseable capture time '{}': {}", raw, e);
                None
            }
        }
    }

    /// Everything at once
    pub fn extract(&self) -> CameraMetadata {
        let size = self.extract_image_size();
        let focal = self.compute_focal();

        CameraMetadata {
            image_width: size.width,
            image_height: size.height,
            make: self.extract_make(),
            model: self.extract_model(),
            sensor: self.extract_sensor(),
            sensor_width: self.extract_sensor_width(),
            focal_length35: focal.f35,
            focal_ratio: focal.ratio,
            capture_time: self.extract_capture_time(),
            location: self.has_geo().then(|| self.extract_geo()),
        }
    }

    /// Degrees/minutes/seconds plus hemisphere reference to signed decimal degrees
    fn geo_to_decimal(&self, key: &str, ref_key: &str) -> f64 {
        let value = match self.tags.get(key) {
            Some(v) => v,
            None => return 0.0,
        };

        let sign = match self.tags.get(ref_key) {
            Some(r) => {
                let r = r.to_text().trim().to_uppercase();
                if r == "S" || r == "W" {
                    -1.0
                } else {
                    1.0
                }
            }
            None => 1.0,
        };

        let part = |i| value.rational(i).map(|r| r.to_f64()).unwrap_or(0.0);
        sign * (part(0) + part(1) / 60.0 + part(2) / 3600.0)
    }
}

/// Length of an EXIF resolution unit in millimeters, 0 when unsupported
fn mm_per_unit(resolution_unit: i64) -> f64 {
    match resolution_unit {
        2 => 25.4,
        3 => 10.0,
        other => {
            warn!("Unknown EXIF resolution unit: {}", other);
            0.0
        }
    }
}
