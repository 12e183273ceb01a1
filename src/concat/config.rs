//! Concatenation run configuration

use crate::model::DEFAULT_PLAYLIST_URL;
use std::path::PathBuf;

/// File name of the concatenated stream inside the output directory
pub const DEFAULT_OUTPUT_FILE: &str = "playlist.mp3";

/// Where a concatenation run reads from and writes to
#[derive(Debug, Clone)]
pub struct ConcatConfig {
    /// Working/output directory (the site's build output)
    pub out_dir: PathBuf,

    /// Directory holding one audio file per track (`<out>/songs`)
    pub songs_dir: PathBuf,

    /// appConfig.json, read for tracks and updated with timestamps
    pub app_config_path: PathBuf,

    /// Name of the produced stream inside `out_dir`
    pub output_file_name: String,

    /// URL recorded in the app config for the produced stream
    pub public_url: String,
}

impl ConcatConfig {
    /// Configuration using the conventional layout under `out_dir`
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            songs_dir: out_dir.join("songs"),
            app_config_path: out_dir.join("appConfig.json"),
            output_file_name: DEFAULT_OUTPUT_FILE.to_string(),
            public_url: DEFAULT_PLAYLIST_URL.to_string(),
            out_dir,
        }
    }

    /// Read audio files from a non-standard directory
    pub fn with_songs_dir(mut self, songs_dir: PathBuf) -> Self {
        self.songs_dir = songs_dir;
        self
    }

    /// Read and update a non-standard app config file
    pub fn with_app_config(mut self, path: PathBuf) -> Self {
        self.app_config_path = path;
        self
    }

    /// Final location of the concatenated stream
    pub fn output_path(&self) -> PathBuf {
        self.out_dir.join(&self.output_file_name)
    }
}
