//! Combined metadata for the stitched track

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A tag value: a single string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    /// Single text value
    Text(String),
    /// Multiple values for the same key
    List(Vec<String>),
}

impl TagValue {
    /// All values in order
    pub fn values(&self) -> Vec<&str> {
        match self {
            TagValue::Text(value) => vec![value.as_str()],
            TagValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// First value, if any
    pub fn first(&self) -> Option<&str> {
        match self {
            TagValue::Text(value) => Some(value.as_str()),
            TagValue::List(values) => values.first().map(String::as_str),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Text(value)
    }
}

impl From<Vec<String>> for TagValue {
    fn from(values: Vec<String>) -> Self {
        TagValue::List(values)
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.values().join("; "))
    }
}

/// Tag key to value mapping
pub type Tags = BTreeMap<String, TagValue>;

/// Merge the tags of both tracks; track B wins on conflicting keys
pub fn merge_tags(a: &Tags, b: &Tags) -> Tags {
    let mut merged = a.clone();
    merged.extend(b.iter().map(|(key, value)| (key.clone(), value.clone())));
    merged
}

/// Per-key outcome of a best-effort tag write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReport {
    /// Keys written to the file
    pub written: Vec<String>,
    /// Keys outside the writer's supported set
    pub skipped: Vec<String>,
    /// Keys the writer tried but could not store, with the reason
    pub failed: Vec<(String, String)>,
}

impl WriteReport {
    /// Whether every supported key was written
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), TagValue::from(*v)))
            .collect()
    }

    #[test]
    fn second_track_wins_conflicts() {
        let a = tags(&[("artist", "X"), ("title", "A")]);
        let b = tags(&[("artist", "Y")]);
        assert_eq!(merge_tags(&a, &b), tags(&[("artist", "Y"), ("title", "A")]));
    }

    #[test]
    fn merge_with_empty_keeps_other_side() {
        let a = tags(&[("album", "Live")]);
        assert_eq!(merge_tags(&a, &Tags::new()), a);
        assert_eq!(merge_tags(&Tags::new(), &a), a);
    }

    #[test]
    fn list_values_display_joined() {
        let value = TagValue::List(vec!["Rock".to_string(), "Pop".to_string()]);
        assert_eq!(value.to_string(), "Rock; Pop");
        assert_eq!(value.first(), Some("Rock"));
    }

    #[test]
    fn untagged_serde_accepts_text_or_list() {
        let parsed: Tags = serde_json::from_str(r#"{"title":"A","genre":["Rock","Pop"]}"#).unwrap();
        assert_eq!(parsed["title"], TagValue::from("A"));
        assert_eq!(
            parsed["genre"],
            TagValue::List(vec!["Rock".to_string(), "Pop".to_string()])
        );
    }
}
