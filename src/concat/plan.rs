//! Timeline planning: which files go into the stream and where each track sits

use crate::analysis::{parse_declared_duration, DurationOracle};
use crate::error::ConcatError;
use crate::model::{Track, TrackTimestamp};
use crate::store::resolve_track_file;
use std::path::{Path, PathBuf};

/// Ordered input files and the gapless timeline they produce
///
/// `input_paths[i]` is the audio file for `timestamps[i]`; both keep the
/// caller's track order with unresolvable tracks left out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConcatenationPlan {
    input_paths: Vec<PathBuf>,
    timestamps: Vec<TrackTimestamp>,
    total_duration: f64,
}

impl ConcatenationPlan {
    /// Append a track at the current end of the timeline
    fn push(&mut self, track: &Track, path: PathBuf, duration: f64) {
        let timestamp = TrackTimestamp::new(track, self.total_duration, duration);
        self.total_duration = timestamp.end_time;
        self.input_paths.push(path);
        self.timestamps.push(timestamp);
    }

    pub fn input_paths(&self) -> &[PathBuf] {
        &self.input_paths
    }

    pub fn timestamps(&self) -> &[TrackTimestamp] {
        &self.timestamps
    }

    /// End time of the last track, in seconds
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn len(&self) -> usize {
        self.input_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_paths.is_empty()
    }
}

/// Lay out `tracks` back to back, in order
///
/// Tracks whose file is missing or whose duration cannot be determined are
/// logged and skipped. Only read-only filesystem checks and oracle probes
/// happen here. An empty result is `ConcatError::NoValidTracks`.
pub fn build_plan<O: DurationOracle + ?Sized>(
    tracks: &[Track],
    songs_dir: &Path,
    oracle: &O,
) -> Result<ConcatenationPlan, ConcatError> {
    let mut plan = ConcatenationPlan::default();

    for track in tracks {
        let Some(path) = resolve_track_file(songs_dir, track.id()) else {
            log::warn!(
                "Audio file not found: {:?}",
                songs_dir.join(format!("{}.mp3", track.id()))
            );
            continue;
        };

        let duration = resolve_duration(track, &path, oracle);
        if duration <= 0.0 {
            log::warn!(
                "Could not determine duration for {}, skipping",
                track.id()
            );
            continue;
        }

        log::debug!(
            "Added {} ({:.1}s) at {:.1}s",
            track.title(),
            duration,
            plan.total_duration()
        );
        plan.push(track, path, duration);
    }

    if plan.is_empty() {
        return Err(ConcatError::NoValidTracks);
    }

    Ok(plan)
}

/// Measured duration when the oracle has a positive answer, else the declared one
pub fn resolve_duration<O: DurationOracle + ?Sized>(track: &Track, path: &Path, oracle: &O) -> f64 {
    match oracle.duration_of(path) {
        Some(seconds) if seconds > 0.0 => seconds,
        _ => parse_declared_duration(track.declared_duration()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::UnknownOracle;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn track(id: &str, duration: &str) -> Track {
        Track::new(id, format!("Title {}", id), "Artist", duration).unwrap()
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"audio").unwrap();
    }

    #[test]
    fn test_declared_durations_when_oracle_unknown() {
        let dir = TempDir::new().unwrap();
        for id in ["a", "b", "c"] {
            touch(dir.path(), &format!("{}.mp3", id));
        }
        let tracks = vec![track("a", "0:30"), track("b", "1:00"), track("c", "0:45")];

        let plan = build_plan(&tracks, dir.path(), &UnknownOracle).unwrap();

        let spans: Vec<(f64, f64, f64)> = plan
            .timestamps()
            .iter()
            .map(|t| (t.start_time, t.end_time, t.duration))
            .collect();
        assert_eq!(
            spans,
            vec![(0.0, 30.0, 30.0), (30.0, 90.0, 60.0), (90.0, 135.0, 45.0)]
        );
        assert_eq!(plan.total_duration(), 135.0);
        assert_eq!(plan.input_paths()[1], dir.path().join("b.mp3"));
    }

    #[test]
    fn test_oracle_wins_over_declared() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.mp3");
        let oracle = |_: &Path| Some(185.3);

        let plan = build_plan(&[track("a", "2:00")], dir.path(), &oracle).unwrap();
        assert_eq!(plan.timestamps()[0].duration, 185.3);
    }

    #[test]
    fn test_declared_fallback_when_oracle_reports_zero() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.mp3");
        let oracle = |_: &Path| Some(0.0);

        let plan = build_plan(&[track("a", "3:45")], dir.path(), &oracle).unwrap();
        assert_eq!(plan.timestamps()[0].duration, 225.0);
    }

    #[test]
    fn test_missing_file_and_bad_duration_are_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.mp3");
        touch(dir.path(), "c.mp3");
        let tracks = vec![
            track("a", "abc"),   // malformed, oracle unknown
            track("b", "1:00"),  // no file
            track("c", "1:2:3"), // malformed
        ];

        let result = build_plan(&tracks, dir.path(), &UnknownOracle);
        assert!(matches!(result, Err(ConcatError::NoValidTracks)));
    }

    #[test]
    fn test_malformed_declared_duration_rescued_by_oracle() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.mp3");
        let oracle = |_: &Path| Some(12.5);

        let plan = build_plan(&[track("a", "abc")], dir.path(), &oracle).unwrap();
        assert_eq!(plan.total_duration(), 12.5);
    }

    #[test]
    fn test_sanitized_filename_is_resolved() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "live_ 2024.mp3");

        let plan = build_plan(&[track("live: 2024", "1:00")], dir.path(), &UnknownOracle).unwrap();
        assert_eq!(plan.input_paths()[0], dir.path().join("live_ 2024.mp3"));
    }

    #[test]
    fn test_order_and_contiguity_with_missing_files() {
        let dir = TempDir::new().unwrap();
        let ids: Vec<String> = (0..40).map(|i| format!("t{:02}", i)).collect();

        // Deterministic pseudo-random subset of missing files
        let mut state: u32 = 0x2545_f491;
        let mut present = Vec::new();
        for id in &ids {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if state % 3 != 0 {
                touch(dir.path(), &format!("{}.mp3", id));
                present.push(id.clone());
            }
        }

        let durations: HashMap<PathBuf, f64> = present
            .iter()
            .enumerate()
            .map(|(i, id)| (dir.path().join(format!("{}.mp3", id)), 10.0 + i as f64 * 0.37))
            .collect();
        let oracle = |p: &Path| durations.get(p).copied();

        let tracks: Vec<Track> = ids.iter().map(|id| track(id, "0:00")).collect();
        let plan = build_plan(&tracks, dir.path(), &oracle).unwrap();

        let planned: Vec<&str> = plan.timestamps().iter().map(|t| t.id.as_str()).collect();
        let expected: Vec<&str> = present.iter().map(|s| s.as_str()).collect();
        assert_eq!(planned, expected);
        assert_eq!(plan.input_paths().len(), plan.timestamps().len());

        let ts = plan.timestamps();
        assert_eq!(ts[0].start_time, 0.0);
        for pair in ts.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
        for t in ts {
            assert!((t.end_time - t.start_time - t.duration).abs() < 1e-9);
        }
        assert_eq!(plan.total_duration(), ts[ts.len() - 1].end_time);
    }
}
