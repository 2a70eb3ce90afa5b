//! EXIF container reader producing a [`TagMap`]

use crate::error::{CameraError, Result};
use crate::tags::{Rational, TagMap, TagValue};
use exif::{Context, Field, In, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct ExifReader;

impl ExifReader {
    /// Read primary-image tags from a JPEG/TIFF/HEIF/PNG/WebP container
    ///
    /// Files without EXIF data (or in a container kamadak-exif does not
    /// support) yield `Ok(None)`; only I/O failures are errors.
    pub fn from_path(path: &Path) -> Result<Option<TagMap>> {
        let file = File::open(path).map_err(|e| CameraError::io(path, e))?;
        let mut reader = BufReader::new(file);

        match exif::Reader::new().read_from_container(&mut reader) {
            Ok(data) => Ok(Some(Self::collect(data.fields()))),
            Err(exif::Error::NotFound(_) | exif::Error::NotSupported(_) | exif::Error::BlankValue(_)) => {
                Ok(None)
            }
            Err(exif::Error::Io(e)) => Err(CameraError::io(path, e)),
            Err(e) => {
                tracing::debug!("Unreadable EXIF in {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Parse a raw EXIF/TIFF blob
    pub fn from_slice(bytes: &[u8]) -> Result<TagMap> {
        let data = exif::Reader::new().read_raw(bytes.to_vec())?;
        Ok(Self::collect(data.fields()))
    }

    fn collect<'a>(fields: impl Iterator<Item = &'a Field>) -> TagMap {
        let mut tags = TagMap::new();

        for field in fields.filter(|f| f.ifd_num == In::PRIMARY) {
            // Unknown tags have no description and no stable name
            if field.tag.description().is_none() {
                continue;
            }

            let group = match field.tag.context() {
                Context::Tiff => "Image",
                Context::Exif => "Photo",
                Context::Gps => "GPSInfo",
                Context::Interop => "Iop",
                #[allow(unreachable_patterns)]
                _ => continue,
            };

            if let Some(value) = convert(&field.value) {
                tags.insert(format!("Exif.{}.{}", group, field.tag), value);
            }
        }

        tags
    }
}

fn convert(value: &Value) -> Option<TagValue> {
    let v = match value {
        Value::Ascii(parts) => {
            let text = parts
                .iter()
                .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').to_string())
                .collect::<Vec<_>>()
                .join(" ");
            TagValue::Text(text)
        }
        Value::Byte(v) => TagValue::Integers(v.iter().map(|x| *x as i64).collect()),
        Value::Short(v) => TagValue::Integers(v.iter().map(|x| *x as i64).collect()),
        Value::Long(v) => TagValue::Integers(v.iter().map(|x| *x as i64).collect()),
        Value::SByte(v) => TagValue::Integers(v.iter().map(|x| *x as i64).collect()),
        Value::SShort(v) => TagValue::Integers(v.iter().map(|x| *x as i64).collect()),
        Value::SLong(v) => TagValue::Integers(v.iter().map(|x| *x as i64).collect()),
        Value::Rational(v) => TagValue::Rationals(
            v.iter()
                .map(|r| Rational::new(r.num as i64, r.denom as i64))
                .collect(),
        ),
        Value::SRational(v) => TagValue::Rationals(
            v.iter()
                .map(|r| Rational::new(r.num as i64, r.denom as i64))
                .collect(),
        ),
        Value::Float(v) => TagValue::Floats(v.iter().map(|x| *x as f64).collect()),
        Value::Double(v) => TagValue::Floats(v.clone()),
        _ => return None,
    };
    Some(v)
}
