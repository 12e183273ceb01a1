//! Rewrite declared song durations from the actual audio files

use super::list::SongList;
use super::model::scalar_to_string;
use crate::analysis::{format_duration, DurationOracle};
use crate::store::{resolve_track_file, save_yaml_atomic};
use anyhow::{Context, Result};
use serde_yaml::Value;
use std::path::Path;

/// Counts reported after a duration analysis pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationReport {
    /// Songs whose declared duration changed
    pub updated: usize,
    /// Songs without an audio file
    pub missing_files: usize,
    /// Audio files the oracle could not measure
    pub unreadable: usize,
    pub total_songs: usize,
}

/// Replace each song's `duration` with the measured length of its file
///
/// Songs without an id, without a file, or with an unmeasurable file keep
/// their current value.
pub fn update_durations<O: DurationOracle + ?Sized>(
    list: &mut SongList,
    songs_dir: &Path,
    oracle: &O,
) -> DurationReport {
    let mut report = DurationReport {
        total_songs: list.len(),
        ..Default::default()
    };

    for (i, song) in list.songs_mut().enumerate() {
        let Some(id) = song.get("id").and_then(scalar_to_string) else {
            log::warn!("Song {} missing 'id' field, skipping", i + 1);
            continue;
        };
        let title = song
            .get("title")
            .and_then(scalar_to_string)
            .unwrap_or_else(|| id.clone());

        let Some(path) = resolve_track_file(songs_dir, &id) else {
            log::warn!("Audio file not found for {}", id);
            report.missing_files += 1;
            continue;
        };

        let Some(seconds) = oracle.duration_of(&path) else {
            log::warn!("Could not get duration for {}", title);
            report.unreadable += 1;
            continue;
        };

        let formatted = format_duration(Some(seconds));
        let old = song
            .get("duration")
            .and_then(scalar_to_string)
            .unwrap_or_else(|| "unknown".to_string());

        if old != formatted {
            log::debug!("Updated {}: {} -> {}", title, old, formatted);
            song.insert(Value::from("duration"), Value::from(formatted));
            report.updated += 1;
        } else {
            log::debug!("{}: {} (unchanged)", title, formatted);
        }
    }

    report
}

/// Analyze `songs_dir` and rewrite the YAML song list at `config_path` in place
pub fn analyze_and_update_durations<O: DurationOracle + ?Sized>(
    config_path: &Path,
    songs_dir: &Path,
    oracle: &O,
) -> Result<DurationReport> {
    let mut list = super::load_song_list(config_path)?;

    let report = update_durations(&mut list, songs_dir, oracle);

    save_yaml_atomic(config_path, list.document())
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    log::info!("Analysis complete!");
    log::info!(
        "Summary: updated={} missing_files={} total_songs={}",
        report.updated,
        report.missing_files,
        report.total_songs
    );

    Ok(report)
}
