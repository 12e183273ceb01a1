//! Typed records exchanged with the web client
//!
//! Track descriptors are read from appConfig.json, resolved timestamps and
//! the concatenated playlist record are written back into it.

mod app_config;
mod playlist;
mod track;

pub use app_config::AppConfig;
pub use playlist::{ConcatenatedPlaylist, DEFAULT_PLAYLIST_URL};
pub use track::{Track, TrackTimestamp, UNKNOWN_ARTIST};
