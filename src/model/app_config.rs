use super::{ConcatenatedPlaylist, Track};
use crate::error::ConfigError;
use crate::store::save_json_atomic;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// The appConfig.json document consumed by the web client
///
/// Only `tracks` and `concatenatedPlaylist` are interpreted; every other
/// field is carried through untouched when the document is saved again.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    root: Map<String, Value>,
}

impl AppConfig {
    /// Wrap an already-parsed JSON object
    pub fn from_map(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Load the document from disk, requiring an object at the root
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(ConfigError::NotAnObject(path.to_path_buf())),
        }
    }

    /// Typed track descriptors, in document order
    ///
    /// Fails on the first entry that is not a valid descriptor.
    pub fn tracks(&self) -> Result<Vec<Track>, ConfigError> {
        let entries = match self.root.get("tracks") {
            Some(Value::Array(entries)) if !entries.is_empty() => entries,
            _ => return Err(ConfigError::NoTracks),
        };

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value::<Track>(entry.clone()).map_err(|e| {
                    ConfigError::InvalidTrack {
                        index,
                        reason: e.to_string(),
                    }
                })
            })
            .collect()
    }

    /// Currently stored concatenated playlist, if any and well-formed
    pub fn concatenated_playlist(&self) -> Option<ConcatenatedPlaylist> {
        self.root
            .get("concatenatedPlaylist")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Replace the `concatenatedPlaylist` field
    pub fn set_concatenated_playlist(&mut self, playlist: &ConcatenatedPlaylist) {
        // Strings and floats only; to_value has no failure case here
        let value = serde_json::to_value(playlist).unwrap_or(Value::Null);
        self.root.insert("concatenatedPlaylist".to_string(), value);
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Write the document atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_json_atomic(path, &self.root).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
