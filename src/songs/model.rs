//! Raw song entries as written in lit_up_config.yaml

use serde_yaml::Value;

/// Song entry (as stored in the YAML song list)
///
/// Every field is optional here; `missing_fields` reports what a usable
/// entry still lacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<String>, // M:SS
    pub is_secret: bool,
}

impl SongEntry {
    /// Read an entry from a YAML mapping; `None` for any other node
    pub fn from_yaml(value: &Value) -> Option<Self> {
        let mapping = value.as_mapping()?;

        Some(Self {
            id: mapping.get("id").and_then(scalar_to_string),
            title: mapping.get("title").and_then(scalar_to_string),
            artist: mapping.get("artist").and_then(scalar_to_string),
            duration: mapping.get("duration").and_then(scalar_to_string),
            is_secret: mapping
                .get("isSecret")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }

    /// Names of required fields this entry does not have
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("id", &self.id),
            ("title", &self.title),
            ("artist", &self.artist),
            ("duration", &self.duration),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Ids are sometimes written as bare numbers in YAML
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_yaml() {
        let value: Value = serde_yaml::from_str(
            "id: 42\ntitle: Lights\nartist: Band\nduration: \"3:05\"\nisSecret: true\n",
        )
        .unwrap();

        let entry = SongEntry::from_yaml(&value).unwrap();
        assert_eq!(entry.id.as_deref(), Some("42"));
        assert_eq!(entry.duration.as_deref(), Some("3:05"));
        assert!(entry.is_secret);
        assert!(entry.missing_fields().is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let value: Value = serde_yaml::from_str("id: abc\ntitle: Only Title\n").unwrap();
        let entry = SongEntry::from_yaml(&value).unwrap();
        assert_eq!(entry.missing_fields(), vec!["artist", "duration"]);
        assert!(!entry.is_secret);
    }

    #[test]
    fn test_non_mapping_is_rejected() {
        let value: Value = serde_yaml::from_str("- just\n- a list\n").unwrap();
        assert!(SongEntry::from_yaml(&value).is_none());
    }
}
