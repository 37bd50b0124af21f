//! Orbital Propagation Library
//!
//! TLE element records and SGP4 propagation producing ECEF state vectors
//! at a fixed cadence over a time window.
//!
//! Propagation failures are per-object: every record propagates into a
//! [`PropagationRun`] carrying the samples produced so far plus a terminal
//! [`PropagationOutcome`], so one degraded orbit never aborts a batch.

use chrono::{DateTime, Duration, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod frames;
pub mod propagator;
pub mod tle;

pub use propagator::propagate;
pub use tle::TleRecord;

#[derive(Error, Debug)]
pub enum PropagationError {
    #[error("Invalid TLE format: {0}")]
    InvalidTle(String),
    #[error("Invalid propagation window: {0}")]
    InvalidWindow(String),
}

pub type Result<T> = std::result::Result<T, PropagationError>;

/// One propagation step: ECEF position/velocity of an object at an instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochState {
    pub object_name: String,
    pub timestamp: DateTime<Utc>,
    /// Position in km, ECEF
    pub position: Vector3<f64>,
    /// Velocity in km/s, ECEF
    pub velocity: Vector3<f64>,
}

/// Half-open sampling window: `start, start+step, ...` while `t < end`.
#[derive(Debug, Clone, Copy)]
pub struct PropagationWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
}

impl PropagationWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> Result<Self> {
        if end <= start {
            return Err(PropagationError::InvalidWindow(format!(
                "start {start} must precede end {end}"
            )));
        }
        if step <= Duration::zero() {
            return Err(PropagationError::InvalidWindow(format!(
                "step interval must be positive, got {step}"
            )));
        }
        Ok(Self { start, end, step })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Step instants of the window, in chronological order.
    pub fn instants(&self) -> impl Iterator<Item = DateTime<Utc>> {
        let step = self.step;
        let end = self.end;
        std::iter::successors(Some(self.start), move |t| {
            let next = *t + step;
            (next < end).then_some(next)
        })
    }

    /// Upper bound on the number of steps: ceil((end - start) / step).
    pub fn max_steps(&self) -> usize {
        let total = (self.end - self.start).num_milliseconds();
        let step = self.step.num_milliseconds();
        (total as u64).div_ceil(step as u64) as usize
    }
}

/// Terminal status of one object's run over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropagationOutcome {
    /// Every step in the window produced a state vector.
    Complete,
    /// The orbit degraded below a usable altitude; iteration stopped at `at`.
    Decayed { at: DateTime<Utc> },
    /// The perturbation model reported a non-decay error at `at`.
    Failed { at: DateTime<Utc>, reason: String },
}

/// Samples and terminal status of one object's propagation.
///
/// `samples` may be shorter than the window if the outcome is not
/// [`PropagationOutcome::Complete`]; samples produced before the terminal
/// condition are always retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationRun {
    pub object_name: String,
    pub samples: Vec<EpochState>,
    pub outcome: PropagationOutcome,
}
