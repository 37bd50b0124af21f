//! Satellite Ground-Track CLI
//!
//! Propagates a file of TLEs over a time window, converts every position to
//! geodetic coordinates and reports the samples inside a geographic region.
//!
//! Usage:
//!   track-satellites --tle-file data/sample_tles.txt \
//!                    --start 2023-06-01T00:00:00Z --end 2023-06-02T00:00:00Z \
//!                    --region 16.66673,103.58196 --region 69.74973,-120.64459 \
//!                    --region -21.09096,-119.71009 --region -31.32309,-147.79778

use anyhow::{bail, Context, Result};
use batch_scheduler::{BatchConfig, BatchScheduler};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use geo_transforms::{Region, Vertex};
use orbital_propagation::{PropagationOutcome, PropagationWindow};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod loader;
mod report;

#[derive(Parser, Debug)]
#[command(
    name = "track-satellites",
    about = "Propagate a batch of TLEs and report geodetic samples inside a region"
)]
struct Args {
    /// Path to the TLE file (name/line1/line2 triples)
    #[arg(short, long)]
    tle_file: PathBuf,

    /// Window start (RFC 3339, e.g. 2023-06-01T00:00:00Z)
    #[arg(long)]
    start: DateTime<Utc>,

    /// Window end, exclusive
    #[arg(long)]
    end: DateTime<Utc>,

    /// Step interval in minutes
    #[arg(long, default_value_t = 1)]
    interval_minutes: i64,

    /// Region vertex as "lat,lon"; repeat per vertex. The filter uses the
    /// bounding box of all vertices; boxes crossing the ±180° meridian are
    /// unsupported
    #[arg(long = "region", value_parser = parse_vertex, required = true)]
    region: Vec<Vertex>,

    /// Worker threads (default: available hardware parallelism)
    #[arg(long)]
    workers: Option<usize>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the filtered samples as JSON (requires --output)
    #[arg(long, requires = "output")]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_vertex(s: &str) -> std::result::Result<Vertex, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lon, got {s:?}"))?;
    let latitude = lat.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let longitude = lon.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(Vertex {
        latitude,
        longitude,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let window = PropagationWindow::new(
        args.start,
        args.end,
        Duration::minutes(args.interval_minutes),
    )
    .context("invalid propagation window")?;
    let region = Region::new(args.region).context("invalid region")?;

    let records = loader::load_tle_file(&args.tle_file)?;
    if records.is_empty() {
        bail!("no usable element records in {}", args.tle_file.display());
    }

    let scheduler = BatchScheduler::new(BatchConfig {
        workers: args.workers,
    })?;
    let run = scheduler.run(&records, &window)?;

    let mut complete = 0usize;
    let mut decayed = 0usize;
    let mut failed = 0usize;
    for r in &run.reports {
        match r.outcome {
            PropagationOutcome::Complete => complete += 1,
            PropagationOutcome::Decayed { .. } => decayed += 1,
            PropagationOutcome::Failed { .. } => failed += 1,
        }
    }
    info!(
        "Propagated {} objects ({} complete, {} decayed, {} failed), {} samples",
        run.reports.len(),
        complete,
        decayed,
        failed,
        run.samples.len()
    );

    let filtered = run.filter_region(&region);
    info!("{} samples inside region", filtered.samples.len());

    match &args.output {
        Some(path) => report::write_file(path, &filtered.samples)?,
        None => report::write_stdout(&filtered.samples)?,
    }

    if args.json {
        // --json requires --output, enforced by clap
        let path = args.output.as_ref().unwrap().with_extension("json");
        info!("Writing JSON samples to {}", path.display());
        let file = File::create(&path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &filtered.samples)?;
    }

    Ok(())
}
