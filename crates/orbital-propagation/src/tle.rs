//! TLE record framing and fixed-width validation.
//!
//! Records are validated once at construction; everything downstream can
//! assume the standard 69-column layout with a trailing mod-10 checksum.

use crate::{PropagationError, Result};
use serde::{Deserialize, Serialize};

/// Standard element-set line length, checksum column included.
const LINE_LEN: usize = 69;

/// A named two-line element set, immutable once validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TleRecord {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl TleRecord {
    /// Validate the fixed-width layout of both lines and construct a record.
    ///
    /// Rejects lines of the wrong length, wrong line number, bad checksum,
    /// or mismatched catalog numbers.
    pub fn new(name: String, line1: String, line2: String) -> Result<Self> {
        validate_line(&line1, b'1')?;
        validate_line(&line2, b'2')?;
        if line1.as_bytes()[2..7] != line2.as_bytes()[2..7] {
            return Err(PropagationError::InvalidTle(format!(
                "catalog numbers disagree: {} vs {}",
                &line1[2..7],
                &line2[2..7]
            )));
        }
        Ok(Self { name, line1, line2 })
    }
}

fn validate_line(line: &str, line_number: u8) -> Result<()> {
    if !line.is_ascii() || line.len() != LINE_LEN {
        return Err(PropagationError::InvalidTle(format!(
            "line must be {LINE_LEN} ASCII columns, got {} in {line:?}",
            line.len()
        )));
    }
    let bytes = line.as_bytes();
    if bytes[0] != line_number || bytes[1] != b' ' {
        return Err(PropagationError::InvalidTle(format!(
            "expected line to start with '{} ', got {:?}",
            line_number as char,
            &line[..2]
        )));
    }
    let expected = (bytes[LINE_LEN - 1] as char)
        .to_digit(10)
        .ok_or_else(|| {
            PropagationError::InvalidTle(format!("checksum column is not a digit in {line:?}"))
        })?;
    let computed = checksum_digit(&line[..LINE_LEN - 1]);
    if computed != expected {
        return Err(PropagationError::InvalidTle(format!(
            "checksum mismatch: computed {computed}, line carries {expected}"
        )));
    }
    Ok(())
}

/// Mod-10 element-set checksum: digits count by value, '-' counts as 1.
pub fn checksum_digit(line: &str) -> u32 {
    let sum: u32 = line
        .chars()
        .map(|c| match c {
            '0'..='9' => c.to_digit(10).unwrap(),
            '-' => 1,
            _ => 0,
        })
        .sum();
    sum % 10
}
