//! Report emission.
//!
//! One line per sample in the fixed
//! `<timestamp>, <objectName>, <longitude>, <latitude>, <altitude>` format;
//! downstream consumers parse these columns, so the layout is a contract.

use anyhow::Result;
use batch_scheduler::GeodeticSample;
use chrono::SecondsFormat;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub fn write_stdout(samples: &[GeodeticSample]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_lines(&mut out, samples)
}

pub fn write_file(path: &Path, samples: &[GeodeticSample]) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_lines(&mut out, samples)?;
    out.flush()?;
    Ok(())
}

fn write_lines<W: Write>(out: &mut W, samples: &[GeodeticSample]) -> Result<()> {
    for s in samples {
        writeln!(
            out,
            "{}, {}, {}, {}, {}",
            s.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            s.object_name,
            s.longitude,
            s.latitude,
            s.altitude_km
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nalgebra::Vector3;

    fn sample() -> GeodeticSample {
        GeodeticSample {
            object_name: "ISS (ZARYA)".into(),
            timestamp: Utc.with_ymd_and_hms(2023, 6, 1, 0, 30, 0).unwrap(),
            position: Vector3::new(6798.0, 0.0, 0.0),
            velocity: Vector3::new(0.0, 7.2, 0.0),
            longitude: -120.5,
            latitude: 45.25,
            altitude_km: 420.125,
        }
    }

    #[test]
    fn test_line_format_is_the_reporting_contract() {
        let mut buf = Vec::new();
        write_lines(&mut buf, &[sample()]).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert_eq!(
            line,
            "2023-06-01T00:30:00Z, ISS (ZARYA), -120.5, 45.25, 420.125\n"
        );
    }

    #[test]
    fn test_one_line_per_sample() {
        let mut buf = Vec::new();
        write_lines(&mut buf, &[sample(), sample(), sample()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
