//! Batch Scheduler Library
//!
//! Fans propagation out across an owned worker pool, one task per element
//! record, waits for every task at the fan-in barrier, converts all produced
//! state vectors to geodetic coordinates and applies the region filter.
//!
//! Tasks are pure functions of (record, window) with no shared mutable
//! state; a failed or decayed object surfaces in its [`ObjectReport`] and
//! never affects sibling tasks.

use chrono::{DateTime, Utc};
use geo_transforms::{ecef_to_geodetic, Region};
use nalgebra::Vector3;
use orbital_propagation::{
    propagate, EpochState, PropagationOutcome, PropagationWindow, TleRecord,
};
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("No element records to schedule")]
    NoRecords,
    #[error("Worker pool construction failed: {0}")]
    Pool(String),
}

pub type Result<T> = std::result::Result<T, BatchError>;

/// Worker pool sizing; `None` uses the available hardware parallelism.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchConfig {
    pub workers: Option<usize>,
}

/// An [`EpochState`] extended with geodetic coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeodeticSample {
    pub object_name: String,
    pub timestamp: DateTime<Utc>,
    /// Position in km, ECEF
    pub position: Vector3<f64>,
    /// Velocity in km/s, ECEF
    pub velocity: Vector3<f64>,
    /// Degrees, [-180, 180]
    pub longitude: f64,
    /// Degrees, [-90, 90]
    pub latitude: f64,
    /// Height above the WGS84 ellipsoid in km
    pub altitude_km: f64,
}

impl GeodeticSample {
    fn from_state(state: EpochState) -> Self {
        let geo = ecef_to_geodetic(&state.position);
        Self {
            object_name: state.object_name,
            timestamp: state.timestamp,
            position: state.position,
            velocity: state.velocity,
            longitude: geo.longitude,
            latitude: geo.latitude,
            altitude_km: geo.altitude_km,
        }
    }
}

/// Per-object diagnostic from one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectReport {
    pub object_name: String,
    pub steps: usize,
    pub outcome: PropagationOutcome,
}

/// Flat sample collection plus per-object diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRun {
    pub samples: Vec<GeodeticSample>,
    pub reports: Vec<ObjectReport>,
}

impl BatchRun {
    /// Retain samples whose coordinates fall inside the region's bounding
    /// box (boundaries inclusive). The box is computed once per call.
    pub fn filter_region(self, region: &Region) -> BatchRun {
        let bbox = region.bounding_box();
        let samples: Vec<GeodeticSample> = self
            .samples
            .into_iter()
            .filter(|s| bbox.contains(s.latitude, s.longitude))
            .collect();
        BatchRun {
            samples,
            reports: self.reports,
        }
    }
}

/// Owns the worker pool for the lifetime of the scheduler.
pub struct BatchScheduler {
    pool: ThreadPool,
}

impl BatchScheduler {
    pub fn new(config: BatchConfig) -> Result<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(workers) = config.workers {
            builder = builder.num_threads(workers);
        }
        let pool = builder
            .build()
            .map_err(|e| BatchError::Pool(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Propagate every record over the window, then convert and aggregate.
    ///
    /// One task per record; the collect is the fan-in barrier. Samples keep
    /// their chronological order within an object; ordering across objects
    /// is unspecified. Conversion is stateless and runs on the same pool.
    pub fn run(&self, records: &[TleRecord], window: &PropagationWindow) -> Result<BatchRun> {
        if records.is_empty() {
            return Err(BatchError::NoRecords);
        }
        info!(objects = records.len(), "dispatching propagation tasks");

        let runs = self
            .pool
            .install(|| records.par_iter().map(|r| propagate(r, window)).collect::<Vec<_>>());

        let mut reports = Vec::with_capacity(runs.len());
        let mut states: Vec<EpochState> = Vec::new();
        for run in runs {
            reports.push(ObjectReport {
                object_name: run.object_name,
                steps: run.samples.len(),
                outcome: run.outcome,
            });
            states.extend(run.samples);
        }

        let samples = self.pool.install(|| {
            states
                .into_par_iter()
                .map(GeodeticSample::from_state)
                .collect::<Vec<_>>()
        });

        debug!(samples = samples.len(), "batch complete");
        Ok(BatchRun { samples, reports })
    }
}
