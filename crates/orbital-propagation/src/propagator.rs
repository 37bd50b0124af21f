//! Time-stepped SGP4 propagation of one element record over a window.

use crate::{
    frames, EpochState, PropagationOutcome, PropagationRun, PropagationWindow, TleRecord,
};
use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use tracing::{debug, warn};

/// SGP4 runs on the WGS72 ellipsoid; a geocentric radius below the
/// equatorial radius is the model's decay condition (legacy status code 6).
const WGS72_EARTH_RADIUS_KM: f64 = 6378.135;

/// Propagate one record across the window at the window's cadence.
///
/// Always returns a run: model initialization or per-step errors terminate
/// this object only, with the samples produced so far retained and the
/// terminal condition recorded in the outcome.
pub fn propagate(record: &TleRecord, window: &PropagationWindow) -> PropagationRun {
    let elements = match sgp4::Elements::from_tle(
        Some(record.name.clone()),
        record.line1.as_bytes(),
        record.line2.as_bytes(),
    ) {
        Ok(elements) => elements,
        Err(e) => return init_failure(record, window, format!("{:?}", e)),
    };

    let constants = match sgp4::Constants::from_elements(&elements) {
        Ok(constants) => constants,
        Err(e) => return init_failure(record, window, format!("{:?}", e)),
    };

    let epoch = DateTime::<Utc>::from_naive_utc_and_offset(elements.datetime, Utc);
    let mut samples = Vec::with_capacity(window.max_steps());

    for t in window.instants() {
        let minutes_since_epoch = (t - epoch).num_milliseconds() as f64 / 60_000.0;

        let prediction = match constants.propagate(minutes_since_epoch) {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!(object = %record.name, at = %t, "propagation failed: {:?}", e);
                return PropagationRun {
                    object_name: record.name.clone(),
                    samples,
                    outcome: PropagationOutcome::Failed {
                        at: t,
                        reason: format!("{:?}", e),
                    },
                };
            }
        };

        let position = Vector3::from(prediction.position);
        let velocity = Vector3::from(prediction.velocity);

        if position.norm() < WGS72_EARTH_RADIUS_KM {
            warn!(object = %record.name, at = %t, "orbit has decayed");
            return PropagationRun {
                object_name: record.name.clone(),
                samples,
                outcome: PropagationOutcome::Decayed { at: t },
            };
        }

        let (position, velocity) = frames::teme_to_ecef(&position, &velocity, frames::gmst(t));
        samples.push(EpochState {
            object_name: record.name.clone(),
            timestamp: t,
            position,
            velocity,
        });
    }

    debug!(object = %record.name, steps = samples.len(), "propagation complete");
    PropagationRun {
        object_name: record.name.clone(),
        samples,
        outcome: PropagationOutcome::Complete,
    }
}

fn init_failure(record: &TleRecord, window: &PropagationWindow, reason: String) -> PropagationRun {
    warn!(object = %record.name, "model initialization failed: {reason}");
    PropagationRun {
        object_name: record.name.clone(),
        samples: Vec::new(),
        outcome: PropagationOutcome::Failed {
            at: window.start(),
            reason,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const ISS_NAME: &str = "ISS (ZARYA)";
    const ISS_LINE1: &str =
        "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
    const ISS_LINE2: &str =
        "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

    // same mean motion as the ISS set, but eccentricity 0.5 with the mean
    // anomaly at perigee: the geocentric radius at epoch is ~3400 km, far
    // below the surface
    const SUBORBITAL_LINE2: &str =
        "2 25544  51.6461 221.2784 5000000   0.0000   0.0000 15.49507896236001";

    // rev-number column corrupted to a non-digit; framing and checksum still
    // hold, so only the model's field parser rejects it
    const UNPARSEABLE_LINE2: &str =
        "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.495078962360A8";

    fn iss() -> TleRecord {
        TleRecord::new(ISS_NAME.into(), ISS_LINE1.into(), ISS_LINE2.into()).unwrap()
    }

    fn epoch_window(minutes: i64) -> PropagationWindow {
        // window aligned to the element-set epoch (2020-07-12T21:16:01Z)
        let start = Utc.with_ymd_and_hms(2020, 7, 12, 21, 16, 1).unwrap();
        PropagationWindow::new(start, start + Duration::minutes(minutes), Duration::minutes(1))
            .unwrap()
    }

    #[test]
    fn test_healthy_object_fills_the_window() {
        let run = propagate(&iss(), &epoch_window(60));
        assert_eq!(run.outcome, PropagationOutcome::Complete);
        assert_eq!(run.samples.len(), 60);
        assert_eq!(run.samples[0].object_name, ISS_NAME);
    }

    #[test]
    fn test_samples_are_chronological_at_window_cadence() {
        let window = epoch_window(30);
        let run = propagate(&iss(), &window);
        for pair in run.samples.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, window.step());
        }
        assert_eq!(run.samples[0].timestamp, window.start());
    }

    #[test]
    fn test_iss_stays_in_low_earth_orbit() {
        let run = propagate(&iss(), &epoch_window(90));
        for s in &run.samples {
            let altitude = s.position.norm() - 6378.137;
            assert!(
                (300.0..500.0).contains(&altitude),
                "altitude {altitude} km out of LEO band at {}",
                s.timestamp
            );
            let speed = s.velocity.norm();
            assert!((6.5..8.5).contains(&speed), "speed {speed} km/s implausible");
        }
    }

    #[test]
    fn test_decay_on_first_step_yields_empty_run() {
        let record =
            TleRecord::new("DEBRIS".into(), ISS_LINE1.into(), SUBORBITAL_LINE2.into()).unwrap();
        let window = epoch_window(5);
        let run = propagate(&record, &window);
        assert!(run.samples.is_empty());
        assert_eq!(
            run.outcome,
            PropagationOutcome::Decayed {
                at: window.start()
            }
        );
    }

    #[test]
    fn test_decay_mid_window_keeps_prior_samples() {
        let record =
            TleRecord::new("DEBRIS".into(), ISS_LINE1.into(), SUBORBITAL_LINE2.into()).unwrap();
        // start half an orbit before the perigee at epoch: early steps are
        // near apogee (valid), later ones descend below the surface
        let start = Utc.with_ymd_and_hms(2020, 7, 12, 20, 46, 1).unwrap();
        let window =
            PropagationWindow::new(start, start + Duration::minutes(60), Duration::minutes(1))
                .unwrap();
        let run = propagate(&record, &window);
        assert!(matches!(run.outcome, PropagationOutcome::Decayed { .. }));
        assert!(!run.samples.is_empty());
        assert!(run.samples.len() < window.max_steps());
    }

    #[test]
    fn test_unparseable_elements_fail_at_window_start() {
        let record =
            TleRecord::new("GARBLED".into(), ISS_LINE1.into(), UNPARSEABLE_LINE2.into()).unwrap();
        let window = epoch_window(10);
        let run = propagate(&record, &window);
        assert!(run.samples.is_empty());
        match run.outcome {
            PropagationOutcome::Failed { at, .. } => assert_eq!(at, window.start()),
            other => panic!("expected Failed outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_run_never_exceeds_window_step_budget() {
        let window = epoch_window(45);
        let run = propagate(&iss(), &window);
        assert!(run.samples.len() <= window.max_steps());
    }
}
