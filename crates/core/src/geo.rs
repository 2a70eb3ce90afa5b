//! Point and footprint geometries in geographic coordinates (EPSG:4326)
//!
//! Stored as EWKT: `SRID=4326;POINT Z (lon lat alt)`.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

pub const SRID_WGS84: u32 = 4326;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Longitude
    pub x: f64,
    /// Latitude
    pub y: f64,
    /// Altitude in meters
    pub z: f64,
}

impl Point {
    pub fn new(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            x: longitude,
            y: latitude,
            z: altitude,
        }
    }

    pub fn to_wkt(&self) -> String {
        format!("POINT Z ({} {} {})", self.x, self.y, self.z)
    }

    pub fn to_ewkt(&self) -> String {
        format!("SRID={};{}", SRID_WGS84, self.to_wkt())
    }

    /// Parse `POINT (x y)` or `POINT Z (x y z)`, with or without an SRID prefix
    pub fn from_ewkt(text: &str) -> Result<Self> {
        let body = strip_srid(text)?;
        let inner = strip_tagged(body, "POINT")?;
        let coords = parse_coords(inner)?;
        Ok(coords)
    }
}

/// A single-ring polygon; the ring is closed (first point repeated last)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub ring: Vec<Point>,
}

impl Polygon {
    /// Build from corner points, closing the ring if needed
    pub fn from_corners(mut corners: Vec<Point>) -> Self {
        if let (Some(first), Some(last)) = (corners.first().copied(), corners.last()) {
            if first != *last {
                corners.push(first);
            }
        }
        Self { ring: corners }
    }

    pub fn to_wkt(&self) -> String {
        let coords: Vec<String> = self
            .ring
            .iter()
            .map(|p| format!("{} {} {}", p.x, p.y, p.z))
            .collect();
        format!("POLYGON Z (({}))", coords.join(", "))
    }

    pub fn to_ewkt(&self) -> String {
        format!("SRID={};{}", SRID_WGS84, self.to_wkt())
    }

    pub fn from_ewkt(text: &str) -> Result<Self> {
        let body = strip_srid(text)?;
        let inner = strip_tagged(body, "POLYGON")?;
        let ring = inner
            .trim()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| CoreError::InvalidGeometry(text.to_string()))?;

        let points = ring
            .split(',')
            .map(parse_coords)
            .collect::<Result<Vec<_>>>()?;

        if points.len() < 4 {
            return Err(CoreError::InvalidGeometry(format!(
                "polygon ring needs at least 4 points: {}",
                text
            )));
        }

        Ok(Self { ring: points })
    }
}

fn strip_srid(text: &str) -> Result<&str> {
    let text = text.trim();
    match text.strip_prefix("SRID=") {
        Some(rest) => {
            let (srid, body) = rest
                .split_once(';')
                .ok_or_else(|| CoreError::InvalidGeometry(text.to_string()))?;
            if srid.trim() != SRID_WGS84.to_string() {
                return Err(CoreError::InvalidGeometry(format!("unsupported SRID {}", srid)));
            }
            Ok(body.trim())
        }
        None => Ok(text),
    }
}

/// `TAG [Z] ( ... )` -> the text between the outer parentheses
fn strip_tagged<'a>(body: &'a str, tag: &str) -> Result<&'a str> {
    let rest = body
        .strip_prefix(tag)
        .ok_or_else(|| CoreError::InvalidGeometry(body.to_string()))?
        .trim_start();
    let rest = rest.strip_prefix('Z').unwrap_or(rest).trim_start();

    rest.strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| CoreError::InvalidGeometry(body.to_string()))
}

fn parse_coords(text: &str) -> Result<Point> {
    let values = text
        .split_whitespace()
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| CoreError::InvalidGeometry(text.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    match values.as_slice() {
        [x, y] => Ok(Point::new(*x, *y, 0.0)),
        [x, y, z] => Ok(Point::new(*x, *y, *z)),
        _ => Err(CoreError::InvalidGeometry(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_wkt() {
        let p = Point::new(-91.99, 46.84, 198.5);
        assert_eq!(p.to_wkt(), "POINT Z (-91.99 46.84 198.5)");
        assert_eq!(p.to_ewkt(), "SRID=4326;POINT Z (-91.99 46.84 198.5)");
        assert_eq!(Point::from_ewkt(&p.to_ewkt()).unwrap(), p);
    }

    #[test]
    fn test_point_without_z_or_srid() {
        let p = Point::from_ewkt("POINT (12.5 41.9)").unwrap();
        assert_eq!(p, Point::new(12.5, 41.9, 0.0));
    }

    #[test]
    fn test_polygon_closes_ring() {
        let poly = Polygon::from_corners(vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
        ]);
        assert_eq!(poly.ring.len(), 4);
        assert_eq!(poly.ring[0], poly.ring[3]);
        assert_eq!(
            poly.to_wkt(),
            "POLYGON Z ((0 0 0, 1 0 0, 1 1 0, 0 0 0))"
        );
        assert_eq!(Polygon::from_ewkt(&poly.to_ewkt()).unwrap(), poly);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Point::from_ewkt("POINT Z (1)").is_err());
        assert!(Point::from_ewkt("LINESTRING (0 0, 1 1)").is_err());
        assert!(Point::from_ewkt("SRID=3857;POINT (0 0)").is_err());
        assert!(Polygon::from_ewkt("POLYGON ((0 0, 1 1))").is_err());
    }
}
