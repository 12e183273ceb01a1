use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Artist shown when a track descriptor carries none
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// A single song as listed in the app config
///
/// Validated at construction: a descriptor without an id or title never
/// makes it past deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawTrack")]
pub struct Track {
    id: String,
    title: String,
    artist: String,
    /// Declared duration, `M:SS` or `MM:SS`
    duration: String,
    is_secret: bool,
}

/// Loose shape of a track entry as found in appConfig.json
///
/// Text fields accept any JSON scalar; hand-edited configs sometimes carry
/// numeric ids or durations.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrack {
    id: Option<Value>,
    title: Option<Value>,
    artist: Option<Value>,
    duration: Option<Value>,
    #[serde(default)]
    is_secret: bool,
}

fn scalar_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl TryFrom<RawTrack> for Track {
    type Error = String;

    fn try_from(raw: RawTrack) -> Result<Self, Self::Error> {
        let track = Track::new(
            scalar_text(raw.id).unwrap_or_default(),
            scalar_text(raw.title).unwrap_or_default(),
            scalar_text(raw.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            scalar_text(raw.duration).unwrap_or_else(|| "0:00".to_string()),
        )?;
        Ok(track.with_secret(raw.is_secret))
    }
}

impl Track {
    /// Create a public track descriptor
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: impl Into<String>,
    ) -> Result<Self, String> {
        let id = id.into();
        let title = title.into();

        if id.trim().is_empty() {
            return Err("track id is missing".to_string());
        }
        if title.trim().is_empty() {
            return Err(format!("track {} has no title", id));
        }

        Ok(Self {
            id,
            title,
            artist: artist.into(),
            duration: duration.into(),
            is_secret: false,
        })
    }

    /// Mark this track as secret (excluded from the concatenated stream)
    pub fn with_secret(mut self, is_secret: bool) -> Self {
        self.is_secret = is_secret;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// Declared duration string, unparsed
    pub fn declared_duration(&self) -> &str {
        &self.duration
    }

    pub fn is_secret(&self) -> bool {
        self.is_secret
    }
}

/// Position of one track within the concatenated timeline
///
/// Times are seconds from the start of the concatenated file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackTimestamp {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
}

impl TrackTimestamp {
    /// Place `track` at `start_time` for `duration` seconds
    pub fn new(track: &Track, start_time: f64, duration: f64) -> Self {
        Self {
            id: track.id().to_string(),
            title: track.title().to_string(),
            artist: track.artist().to_string(),
            start_time,
            end_time: start_time + duration,
            duration,
        }
    }
}
