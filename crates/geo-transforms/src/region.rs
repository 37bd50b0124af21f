//! Geographic regions and the axis-aligned bounding-box filter.

use crate::{GeoError, Result};
use serde::{Deserialize, Serialize};

/// A (latitude, longitude) vertex in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub latitude: f64,
    pub longitude: f64,
}

/// A set of vertices whose bounding box drives the sample filter.
///
/// The filter tests the axis-aligned bounding box of the vertices, not the
/// polygon they may describe, so non-rectangular regions are
/// over-approximated. Regions crossing the +-180 degree meridian are not
/// supported: min/max of raw longitudes yields the complementary box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    vertices: Vec<Vertex>,
}

impl Region {
    /// Validate vertex ranges and construct a region. At least one vertex is
    /// required; a single vertex yields a zero-area box.
    pub fn new(vertices: Vec<Vertex>) -> Result<Self> {
        if vertices.is_empty() {
            return Err(GeoError::EmptyRegion);
        }
        for v in &vertices {
            if !is_valid_latitude(v.latitude) || !is_valid_longitude(v.longitude) {
                return Err(GeoError::InvalidCoordinates(format!(
                    "vertex ({}, {}) outside latitude/longitude ranges",
                    v.latitude, v.longitude
                )));
            }
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Min/max latitude and longitude over all vertices.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox {
            min_latitude: f64::INFINITY,
            max_latitude: f64::NEG_INFINITY,
            min_longitude: f64::INFINITY,
            max_longitude: f64::NEG_INFINITY,
        };
        for v in &self.vertices {
            bbox.min_latitude = bbox.min_latitude.min(v.latitude);
            bbox.max_latitude = bbox.max_latitude.max(v.latitude);
            bbox.min_longitude = bbox.min_longitude.min(v.longitude);
            bbox.max_longitude = bbox.max_longitude.max(v.longitude);
        }
        bbox
    }
}

/// Axis-aligned latitude/longitude box, boundaries inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_latitude
            && latitude <= self.max_latitude
            && longitude >= self.min_longitude
            && longitude <= self.max_longitude
    }
}

fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}
