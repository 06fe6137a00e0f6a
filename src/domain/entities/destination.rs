//! Destination entry: one redirect target in the registry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A redirect destination with an optional display label.
///
/// Entries are unique by position, not by url: the same url may appear
/// several times in a registry to give it more weight in the rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationEntry {
    #[serde(default)]
    pub name: String,
    pub url: String,
}

impl DestinationEntry {
    /// Creates a new entry.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Creates an entry with an empty display label.
    pub fn unnamed(url: impl Into<String>) -> Self {
        Self::new(String::new(), url)
    }

    /// Parses one raw list element as read back from the store.
    ///
    /// Accepted representations:
    ///
    /// - a JSON object with a non-empty `url` (or legacy `link`) string field
    /// - a bare URL string
    ///
    /// Returns `None` for empty input and for JSON objects that carry no usable url.
    ///
    /// # Examples
    ///
    /// ```
    /// use link_rotator::domain::entities::DestinationEntry;
    ///
    /// let entry = DestinationEntry::parse_stored(r#"{"name":"Ana","url":"https://wa.me/1"}"#);
    /// assert_eq!(entry, Some(DestinationEntry::new("Ana", "https://wa.me/1")));
    ///
    /// let bare = DestinationEntry::parse_stored(" https://wa.me/2 ");
    /// assert_eq!(bare, Some(DestinationEntry::unnamed("https://wa.me/2")));
    /// ```
    pub fn parse_stored(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(object)) => Self::from_object(&object),
            _ => Some(Self::unnamed(trimmed)),
        }
    }

    /// Serializes the entry in the form written to the registry list.
    pub fn to_stored(&self) -> String {
        serde_json::json!({ "name": self.name, "url": self.url }).to_string()
    }

    fn from_object(object: &Map<String, Value>) -> Option<Self> {
        let url = ["url", "link"]
            .iter()
            .filter_map(|field| object.get(*field).and_then(Value::as_str))
            .map(str::trim)
            .find(|url| !url.is_empty())?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Some(Self::new(name, url))
    }
}
