//! Post-run check of the concatenated stream

use crate::analysis::DurationOracle;
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Allowed gap between measured and planned stream length, in seconds
pub const DURATION_TOLERANCE_SECS: f64 = 2.0;

/// Check that `output` exists, is non-empty and roughly matches `expected_duration`
///
/// A length mismatch is only logged: encoder padding and VBR headers make
/// small drifts normal, and the planned timeline is what clients seek by.
/// Returns the measured duration when the oracle could determine it.
pub fn validate_output<O: DurationOracle + ?Sized>(
    output: &Path,
    expected_duration: f64,
    oracle: &O,
) -> Result<Option<f64>> {
    log::info!("Validating output at: {:?}", output);

    let metadata = std::fs::metadata(output)
        .with_context(|| format!("Output file not found: {:?}", output))?;

    if !metadata.is_file() {
        bail!("Output is not a file: {:?}", output);
    }
    if metadata.len() == 0 {
        bail!("Output file is empty: {:?}", output);
    }

    log::debug!(
        "Output file size: {:.1} MB",
        metadata.len() as f64 / (1024.0 * 1024.0)
    );

    let measured = oracle.duration_of(output);
    match measured {
        Some(seconds) if (seconds - expected_duration).abs() > DURATION_TOLERANCE_SECS => {
            log::warn!(
                "Output duration {:.1}s differs from planned {:.1}s",
                seconds,
                expected_duration
            );
        }
        Some(seconds) => {
            log::info!("✅ Output file is valid ({:.1}s)", seconds);
        }
        None => {
            log::warn!("Could not measure output duration; file may have issues");
        }
    }

    Ok(measured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_and_empty_outputs_fail() {
        let dir = TempDir::new().unwrap();
        let oracle = |_: &Path| None;

        let missing = dir.path().join("playlist.mp3");
        assert!(validate_output(&missing, 10.0, &oracle).is_err());

        fs::write(&missing, b"").unwrap();
        assert!(validate_output(&missing, 10.0, &oracle).is_err());
    }

    #[test]
    fn test_mismatch_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("playlist.mp3");
        fs::write(&output, b"audio").unwrap();

        let oracle = |_: &Path| Some(100.0);
        let measured = validate_output(&output, 135.0, &oracle).unwrap();
        assert_eq!(measured, Some(100.0));
    }
}
