//! Song list (lit_up_config.yaml) loading

use super::model::SongEntry;
use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// A parsed song list
///
/// Keeps the full YAML document so rewrites preserve keys this crate does
/// not interpret.
#[derive(Debug, Clone)]
pub struct SongList {
    document: Mapping,
}

impl SongList {
    /// Parse YAML text, requiring a mapping root with a `songs` list
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content).context("Error parsing YAML")?;

        let document = match value {
            Value::Mapping(m) => m,
            Value::Null => Mapping::new(),
            _ => bail!("YAML root must be a mapping"),
        };

        match document.get("songs") {
            None => bail!("No 'songs' key found in YAML file"),
            Some(Value::Sequence(_)) => {}
            Some(_) => bail!("'songs' must be a list"),
        }

        Ok(Self { document })
    }

    /// Optional site-wide header message
    pub fn header_message(&self) -> Option<String> {
        self.document
            .get("header_message")
            .and_then(super::model::scalar_to_string)
    }

    /// Song entries in file order; non-mapping items become `None`
    pub fn entries(&self) -> Vec<Option<SongEntry>> {
        self.songs().iter().map(SongEntry::from_yaml).collect()
    }

    pub fn len(&self) -> usize {
        self.songs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs().is_empty()
    }

    fn songs(&self) -> &[Value] {
        self.document
            .get("songs")
            .and_then(Value::as_sequence)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Raw song mappings, for in-place edits
    pub(crate) fn songs_mut(&mut self) -> impl Iterator<Item = &mut Mapping> {
        self.document
            .get_mut("songs")
            .and_then(Value::as_sequence_mut)
            .into_iter()
            .flatten()
            .filter_map(Value::as_mapping_mut)
    }

    pub fn document(&self) -> &Mapping {
        &self.document
    }
}

/// Load and validate a song list file
pub fn load_song_list(path: &Path) -> Result<SongList> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read song list: {:?}", path))?;

    SongList::parse(&content).with_context(|| format!("Invalid song list: {:?}", path))
}
