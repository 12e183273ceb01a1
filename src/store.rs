//! On-disk layout helpers: atomic document writes and audio filename policy

use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Extension of the per-track audio files and the concatenated stream
pub const AUDIO_EXTENSION: &str = "mp3";

/// Build a filesystem-safe filename from a track id
///
/// Replaces `< > : " / \ | ? *` and ASCII control characters with `_`.
pub fn sanitize_filename(id: &str, extension: &str) -> String {
    let safe: String = id
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if (c as u32) < 0x20 => '_',
            c => c,
        })
        .collect();
    format!("{}.{}", safe, extension)
}

/// Locate the audio file for a track id inside `songs_dir`
///
/// The literal `<id>.mp3` wins so files downloaded before ids were
/// sanitized keep resolving; the sanitized name is tried second.
pub fn resolve_track_file(songs_dir: &Path, track_id: &str) -> Option<PathBuf> {
    let legacy = songs_dir.join(format!("{}.{}", track_id, AUDIO_EXTENSION));
    if legacy.is_file() {
        return Some(legacy);
    }

    let sanitized = songs_dir.join(sanitize_filename(track_id, AUDIO_EXTENSION));
    if sanitized.is_file() {
        return Some(sanitized);
    }

    None
}

/// Write `data` to `path` through a sibling temp file and a rename
///
/// Readers see either the old content or the new one, never a mix.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name))
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Pretty-print `value` as JSON (two-space indent, trailing newline) atomically
pub fn save_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
    let mut data = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
    data.push(b'\n');
    write_bytes_atomic(path, &data)
}

/// Serialize `value` as YAML atomically
pub fn save_yaml_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> io::Result<()> {
    let data = serde_yaml::to_string(value).map_err(io::Error::other)?;
    write_bytes_atomic(path, data.as_bytes())
}
