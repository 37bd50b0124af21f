//! Geodetic Transforms Library
//!
//! WGS84 ECEF to geodetic conversion (Bowring's method) and axis-aligned
//! geographic region filtering.

use thiserror::Error;

pub mod geodetic;
pub mod region;

pub use geodetic::{ecef_to_geodetic, geodetic_to_ecef, GeodeticPosition};
pub use region::{BoundingBox, Region, Vertex};

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Region needs at least one vertex")]
    EmptyRegion,
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

pub type Result<T> = std::result::Result<T, GeoError>;
