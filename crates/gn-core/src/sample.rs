//! Accelerometer samples and their line-oriented text form.
//!
//! One sample per line: `t_ms x y z`, separated by whitespace and/or commas.
//! Blank lines and lines starting with `#` are skipped.

use serde::{Deserialize, Serialize};

use crate::error::{GravError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds on the caller's clock.
    pub t_ms: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Sample {
    pub fn new(t_ms: u64, x: f64, y: f64, z: f64) -> Self {
        Self { t_ms, x, y, z }
    }

    pub fn axis_sum(&self) -> f64 {
        self.x + self.y + self.z
    }

    /// Parse one line. `line_no` is 1-based and only used for errors.
    /// Returns `Ok(None)` for blank and comment lines.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() != 4 {
            return Err(GravError::InvalidSample {
                line: line_no,
                reason: format!("expected 4 fields (t_ms x y z), got {}", fields.len()),
            });
        }

        let t_ms = fields[0].parse::<u64>().map_err(|e| GravError::InvalidSample {
            line: line_no,
            reason: format!("bad timestamp '{}': {e}", fields[0]),
        })?;

        let mut axes = [0.0f64; 3];
        for (slot, raw) in axes.iter_mut().zip(&fields[1..]) {
            let v = raw.parse::<f64>().map_err(|e| GravError::InvalidSample {
                line: line_no,
                reason: format!("bad axis value '{raw}': {e}"),
            })?;
            if !v.is_finite() {
                return Err(GravError::InvalidSample {
                    line: line_no,
                    reason: format!("axis value '{raw}' is not finite"),
                });
            }
            *slot = v;
        }

        Ok(Some(Self::new(t_ms, axes[0], axes[1], axes[2])))
    }
}

/// Parse a whole document of samples.
pub fn parse_samples(text: &str) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(sample) = Sample::parse_line(line, i + 1)? {
            samples.push(sample);
        }
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whitespace_and_commas() {
        let a = Sample::parse_line("120 0.5 -9.8 1.25", 1).unwrap().unwrap();
        let b = Sample::parse_line("120, 0.5, -9.8, 1.25", 1).unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.t_ms, 120);
        assert!((a.axis_sum() - (0.5 - 9.8 + 1.25)).abs() < 1e-12);
    }

    #[test]
    fn test_skips_blank_and_comments() {
        let text = "# t x y z\n\n0 0 0 9.8\n   \n200 1 1 9.8\n";
        let samples = parse_samples(text).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].t_ms, 200);
    }

    #[test]
    fn test_reports_line_number() {
        let text = "0 0 0 0\n100 1 2\n";
        let err = parse_samples(text).unwrap_err();
        assert_eq!(
            err,
            GravError::InvalidSample {
                line: 2,
                reason: "expected 4 fields (t_ms x y z), got 3".into()
            }
        );
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(Sample::parse_line("-5 0 0 0", 1).is_err());
        assert!(Sample::parse_line("10 a 0 0", 1).is_err());
        assert!(Sample::parse_line("10 inf 0 0", 1).is_err());
    }
}
