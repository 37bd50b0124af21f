//! ECEF <-> geodetic conversions on the WGS84 ellipsoid.
//!
//! The inverse problem (ECEF to latitude/altitude) has no closed form on an
//! ellipsoid; Bowring's parametric-latitude iteration converges to sub-meter
//! accuracy in one or two passes for any orbital radius.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// WGS84 semi-major axis in km.
pub const WGS84_A_KM: f64 = 6378.137;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257223563;
/// First eccentricity squared.
const E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Latitude update tolerance in radians (~6 mm on the surface).
const LAT_TOLERANCE_RAD: f64 = 1e-9;
/// Iteration budget for the Bowring refinement.
const MAX_ITERATIONS: usize = 5;
/// Equatorial distance below which a position counts as polar.
const POLAR_EPS_KM: f64 = 1e-9;

/// Geodetic coordinates referenced to the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeodeticPosition {
    /// Geodetic latitude in degrees, [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180].
    pub longitude: f64,
    /// Height above the ellipsoid in km.
    pub altitude_km: f64,
}

/// Convert an ECEF position (km) to geodetic coordinates.
///
/// Longitude is the direct `atan2(y, x)`. Latitude and altitude iterate
/// Bowring's method; if the iteration budget runs out the last iterate is
/// returned and a warning is emitted. Positions on (or numerically at) the
/// rotation axis fall back to latitude +-90 with longitude 0.
pub fn ecef_to_geodetic(position: &Vector3<f64>) -> GeodeticPosition {
    let (x, y, z) = (position.x, position.y, position.z);
    let p = x.hypot(y);
    let b = WGS84_A_KM * (1.0 - WGS84_F);

    if p < POLAR_EPS_KM {
        return GeodeticPosition {
            latitude: if z >= 0.0 { 90.0 } else { -90.0 },
            longitude: 0.0,
            altitude_km: z.abs() - b,
        };
    }

    let longitude = y.atan2(x).to_degrees();

    // Bowring: iterate on the parametric latitude beta
    let ep2 = (WGS84_A_KM * WGS84_A_KM - b * b) / (b * b);
    let mut beta = (z / ((1.0 - WGS84_F) * p)).atan();
    let mut latitude = 0.0;
    let mut converged = false;
    for _ in 0..MAX_ITERATIONS {
        let (sin_b, cos_b) = beta.sin_cos();
        let next = (z + ep2 * b * sin_b.powi(3)).atan2(p - E2 * WGS84_A_KM * cos_b.powi(3));
        let delta = (next - latitude).abs();
        latitude = next;
        beta = ((1.0 - WGS84_F) * latitude.tan()).atan();
        if delta < LAT_TOLERANCE_RAD {
            converged = true;
            break;
        }
    }
    if !converged {
        warn!(x, y, z, "geodetic latitude did not converge; using last iterate");
    }

    let (sin_lat, cos_lat) = latitude.sin_cos();
    let n = WGS84_A_KM / (1.0 - E2 * sin_lat * sin_lat).sqrt();
    let altitude_km = if cos_lat.abs() > 1e-10 {
        p / cos_lat - n
    } else {
        z.abs() - b
    };

    GeodeticPosition {
        // deep-interior positions can push the Bowring angle past a pole;
        // the contract is [-90, 90]
        latitude: latitude.to_degrees().clamp(-90.0, 90.0),
        longitude,
        altitude_km,
    }
}

/// Forward transform: geodetic coordinates to an ECEF position in km.
pub fn geodetic_to_ecef(geo: &GeodeticPosition) -> Vector3<f64> {
    let lat = geo.latitude.to_radians();
    let lon = geo.longitude.to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    let n = WGS84_A_KM / (1.0 - E2 * sin_lat * sin_lat).sqrt();

    Vector3::new(
        (n + geo.altitude_km) * cos_lat * cos_lon,
        (n + geo.altitude_km) * cos_lat * sin_lon,
        (n * (1.0 - E2) + geo.altitude_km) * sin_lat,
    )
}
