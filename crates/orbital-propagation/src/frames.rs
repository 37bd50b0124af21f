//! TEME to ECEF rotation via Greenwich mean sidereal time.
//!
//! SGP4 predictions come out in the quasi-inertial TEME frame; the pipeline
//! contract is ECEF, so every prediction is rotated about the Z axis by the
//! GMST angle of its timestamp.

use chrono::{DateTime, Utc};
use nalgebra::{Matrix3, Vector3};
use std::f64::consts::TAU;

/// Earth rotation rate in rad/s.
pub const EARTH_ROTATION_RATE_RAD_S: f64 = 7.2921159e-5;

/// Greenwich mean sidereal time in radians for a UTC instant (IAU-82).
pub fn gmst(at: DateTime<Utc>) -> f64 {
    // Julian date from the Unix timestamp, then Julian centuries from J2000.0
    let jd = at.timestamp_millis() as f64 / 86_400_000.0 + 2_440_587.5;
    let t = (jd - 2_451_545.0) / 36_525.0;

    let gmst_sec = 67_310.54841
        + (876_600.0 * 3600.0 + 8_640_184.812866) * t
        + 0.093104 * t * t
        - 6.2e-6 * t * t * t;

    // seconds of time -> degrees (1/240) -> radians, wrapped to [0, 2pi)
    (gmst_sec / 240.0).to_radians().rem_euclid(TAU)
}

/// Rotate a TEME state into ECEF about the Z axis by `gmst_rad`.
///
/// The velocity picks up the frame rotation term -w x r, with w the Earth
/// rotation vector along +Z.
pub fn teme_to_ecef(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    gmst_rad: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let (sin_g, cos_g) = gmst_rad.sin_cos();
    #[rustfmt::skip]
    let rot = Matrix3::new(
         cos_g, sin_g, 0.0,
        -sin_g, cos_g, 0.0,
           0.0,   0.0, 1.0,
    );

    let r = rot * position;
    let mut v = rot * velocity;
    v.x += EARTH_ROTATION_RATE_RAD_S * r.y;
    v.y -= EARTH_ROTATION_RATE_RAD_S * r.x;

    (r, v)
}
