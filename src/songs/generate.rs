//! appConfig.json generation from the song list

use super::list::SongList;
use crate::store::save_json_atomic;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A track entry as the web client expects it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppTrack {
    pub id: String,
    pub src: String,
    pub title: String,
    pub artist: String,
    pub duration: String,
    pub cover: String,
    pub is_secret: bool,
}

/// Freshly generated appConfig.json content
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedConfig {
    pub tracks: Vec<AppTrack>,
    pub header_message: Option<String>,
    pub build_datetime: String,
    pub build_hash: String,
}

/// Turn the song list into app config content
///
/// Songs missing a required field are warned about and left out. Fails if
/// nothing usable remains.
pub fn build_app_config(list: &SongList) -> Result<GeneratedConfig> {
    let mut tracks = Vec::new();

    for (i, entry) in list.entries().into_iter().enumerate() {
        let Some(entry) = entry else {
            log::warn!("Song {} is not a mapping, skipping", i + 1);
            continue;
        };

        let missing = entry.missing_fields();
        if !missing.is_empty() {
            log::warn!(
                "Song {} missing fields: {:?}",
                entry.id.as_deref().unwrap_or("unknown"),
                missing
            );
            continue;
        }

        let id = entry.id.unwrap_or_default();
        tracks.push(AppTrack {
            src: format!("/songs/{}.mp3", id),
            cover: format!("/album_art/{}.jpg", id),
            title: entry.title.unwrap_or_default(),
            artist: entry.artist.unwrap_or_default(),
            duration: entry.duration.unwrap_or_default(),
            is_secret: entry.is_secret,
            id,
        });
    }

    if tracks.is_empty() {
        bail!("No valid tracks found in YAML file");
    }

    let now = chrono::Local::now();
    let build_hash = build_hash(&now, &tracks);

    Ok(GeneratedConfig {
        tracks,
        header_message: list.header_message(),
        build_datetime: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        build_hash,
    })
}

/// 32 hex chars, unique per build
fn build_hash(now: &chrono::DateTime<chrono::Local>, tracks: &[AppTrack]) -> String {
    let mut seed = format!(
        "{}:{}",
        now.timestamp_nanos_opt().unwrap_or_default(),
        std::process::id()
    );
    for track in tracks {
        seed.push(':');
        seed.push_str(&track.id);
    }
    format!("{:x}", md5::compute(seed.as_bytes()))
}

/// Write `<out_dir>/appConfig.json` from the song list at `config_path`
///
/// Returns the written path and the number of tracks in it.
pub fn generate_app_config(config_path: &Path, out_dir: &Path) -> Result<(PathBuf, usize)> {
    log::info!("Loading configuration from {:?}", config_path);
    let list = super::load_song_list(config_path)?;

    let config = build_app_config(&list)?;

    let output_path = out_dir.join("appConfig.json");
    log::info!("Saving configuration to {:?}", output_path);
    save_json_atomic(&output_path, &config)
        .with_context(|| format!("Failed to write {:?}", output_path))?;

    log::info!("Generated appConfig.json with {} tracks", config.tracks.len());
    Ok((output_path, config.tracks.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppConfig;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
header_message: Hello
songs:
  - id: one
    title: One
    artist: A
    duration: "1:00"
  - id: two
    title: Two
    duration: "2:00"
  - id: three
    title: Three
    artist: C
    duration: "3:00"
    isSecret: true
"#;

    #[test]
    fn test_build_skips_incomplete_songs() {
        let list = SongList::parse(SAMPLE).unwrap();
        let config = build_app_config(&list).unwrap();

        let ids: Vec<&str> = config.tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["one", "three"]);
        assert_eq!(config.tracks[0].src, "/songs/one.mp3");
        assert_eq!(config.tracks[0].cover, "/album_art/one.jpg");
        assert!(config.tracks[1].is_secret);
        assert_eq!(config.header_message.as_deref(), Some("Hello"));
        assert_eq!(config.build_hash.len(), 32);
    }

    #[test]
    fn test_build_fails_without_valid_tracks() {
        let list = SongList::parse("songs:\n  - id: x\n").unwrap();
        assert!(build_app_config(&list).is_err());
    }

    #[test]
    fn test_generated_config_is_readable_as_app_config() {
        let dir = TempDir::new().unwrap();
        let yaml = dir.path().join("lit_up_config.yaml");
        fs::write(&yaml, SAMPLE).unwrap();
        let out_dir = dir.path().join(".out");

        let (path, count) = generate_app_config(&yaml, &out_dir).unwrap();
        assert_eq!(count, 2);

        let app_config = AppConfig::load(&path).unwrap();
        let tracks = app_config.tracks().unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].declared_duration(), "3:00");
        assert!(tracks[1].is_secret());
        assert_eq!(app_config.as_map()["headerMessage"], "Hello");
        assert!(app_config.as_map()["buildDatetime"].is_string());
    }
}
