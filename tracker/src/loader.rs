//! TLE file loading: name/line1/line2 triples.

use anyhow::{Context, Result};
use orbital_propagation::TleRecord;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Load a file of element-set triples.
///
/// Malformed records are logged and skipped; they never abort the rest of
/// the batch. The caller decides whether an empty result is fatal.
pub fn load_tle_file(path: &Path) -> Result<Vec<TleRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let lines: Vec<String> = BufReader::new(file)
        .lines()
        .collect::<io::Result<_>>()
        .with_context(|| format!("reading {}", path.display()))?;

    let mut records = Vec::with_capacity(lines.len() / 3);
    let mut skipped = 0;
    for triple in lines.chunks(3) {
        let [name, line1, line2] = triple else {
            warn!("trailing lines do not form a full record; ignoring");
            break;
        };
        match TleRecord::new(
            name.trim().to_string(),
            line1.trim_end().to_string(),
            line2.trim_end().to_string(),
        ) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("skipping record {:?}: {e}", name.trim());
                skipped += 1;
            }
        }
    }

    info!(
        "Loaded {} element records ({} skipped)",
        records.len(),
        skipped
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ISS: &str = "ISS (ZARYA)\n\
        1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992\n\
        2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008\n";

    #[test]
    fn test_loads_triples() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ISS.as_bytes()).unwrap();
        file.write_all(ISS.as_bytes()).unwrap();

        let records = load_tle_file(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "ISS (ZARYA)");
    }

    #[test]
    fn test_skips_malformed_record_and_keeps_the_rest() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"BROKEN\nnot a tle line\nnot a tle line either\n")
            .unwrap();
        file.write_all(ISS.as_bytes()).unwrap();

        let records = load_tle_file(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ISS (ZARYA)");
    }

    #[test]
    fn test_trailing_partial_record_is_ignored() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ISS.as_bytes()).unwrap();
        file.write_all(b"DANGLING NAME\n").unwrap();

        let records = load_tle_file(file.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_tle_file(Path::new("/nonexistent/tles.txt")).is_err());
    }
}
