use super::TrackTimestamp;
use serde::{Deserialize, Serialize};

/// Public URL of the concatenated file, as served next to appConfig.json
pub const DEFAULT_PLAYLIST_URL: &str = "/playlist.mp3";

/// The `concatenatedPlaylist` record of the app config
///
/// Replaced wholesale on every successful run, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcatenatedPlaylist {
    pub enabled: bool,

    /// URL the web client loads the stream from
    pub file: String,

    /// Track positions, in playback order
    pub tracks: Vec<TrackTimestamp>,

    /// Length of the whole stream in seconds
    pub total_duration: f64,
}

impl ConcatenatedPlaylist {
    pub fn new(file: impl Into<String>, tracks: Vec<TrackTimestamp>, total_duration: f64) -> Self {
        Self {
            enabled: true,
            file: file.into(),
            tracks,
            total_duration,
        }
    }

    /// Number of tracks in the stream
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
