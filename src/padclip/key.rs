//! # Selection Keys
//!
//! Every item on a pad is identified by one opaque string key. Two kinds of
//! identity share that key space:
//!
//! ```text
//! pages|42            record: schema name + id
//! _FILE|9ebc7e5c74    path:   fixed marker + short hash of the full path
//! ```
//!
//! Inside the crate keys are a closed enum ([`SelectionKey`]); the string form
//! only exists at the storage and input boundaries, where [`SelectionKey::from_str`]
//! and [`Display`](std::fmt::Display) convert between the two.

use crate::error::{ClipError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Virtual schema name reserved for filesystem paths.
pub const PATH_MARKER: &str = "_FILE";

pub const KEY_SEPARATOR: char = '|';

/// Number of hex characters kept from the path digest.
const PATH_HASH_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SelectionKey {
    Record { schema: String, id: String },
    Path { hash: String },
}

impl SelectionKey {
    pub fn record(schema: impl Into<String>, id: impl Into<String>) -> Self {
        SelectionKey::Record {
            schema: schema.into(),
            id: id.into(),
        }
    }

    pub fn path(path: &str) -> Self {
        SelectionKey::Path {
            hash: short_hash(path),
        }
    }

    /// The schema part of the key; paths report [`PATH_MARKER`].
    pub fn schema(&self) -> &str {
        match self {
            SelectionKey::Record { schema, .. } => schema,
            SelectionKey::Path { .. } => PATH_MARKER,
        }
    }

    pub fn is_path(&self) -> bool {
        matches!(self, SelectionKey::Path { .. })
    }

    pub fn as_record(&self) -> Option<RecordRef> {
        match self {
            SelectionKey::Record { schema, id } => Some(RecordRef::new(schema.clone(), id.clone())),
            SelectionKey::Path { .. } => None,
        }
    }
}

impl std::fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionKey::Record { schema, id } => write!(f, "{}{}{}", schema, KEY_SEPARATOR, id),
            SelectionKey::Path { hash } => write!(f, "{}{}{}", PATH_MARKER, KEY_SEPARATOR, hash),
        }
    }
}

impl FromStr for SelectionKey {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self> {
        let (schema, rest) = s
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| ClipError::InvalidKey(s.to_string()))?;

        if schema.is_empty() || rest.is_empty() {
            return Err(ClipError::InvalidKey(s.to_string()));
        }

        if schema == PATH_MARKER {
            Ok(SelectionKey::Path {
                hash: rest.to_string(),
            })
        } else {
            Ok(SelectionKey::record(schema, rest))
        }
    }
}

impl TryFrom<String> for SelectionKey {
    type Error = ClipError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SelectionKey> for String {
    fn from(key: SelectionKey) -> Self {
        key.to_string()
    }
}

/// A record addressed by schema name and id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub schema: String,
    pub id: String,
}

impl RecordRef {
    pub fn new(schema: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            id: id.into(),
        }
    }

    pub fn key(&self) -> SelectionKey {
        SelectionKey::record(self.schema.clone(), self.id.clone())
    }
}

impl std::fmt::Display for RecordRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.schema, KEY_SEPARATOR, self.id)
    }
}

/// Short, stable digest of a full path. Case and separators are significant.
pub fn short_hash(path: &str) -> String {
    let digest = Sha256::digest(path.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(PATH_HASH_LEN);
    hex
}

/// Payload truthiness: empty strings and `"0"` mark a deselected or stale entry.
pub fn is_truthy(payload: &str) -> bool {
    !payload.is_empty() && payload != "0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_round_trips_through_string() {
        let key = SelectionKey::record("tt_content", "5");
        assert_eq!(key.to_string(), "tt_content|5");
        assert_eq!("tt_content|5".parse::<SelectionKey>().unwrap(), key);
    }

    #[test]
    fn path_key_uses_marker_and_short_hash() {
        let key = SelectionKey::path("/srv/files/report.pdf");
        let encoded = key.to_string();
        assert!(encoded.starts_with("_FILE|"));
        assert_eq!(encoded.len(), "_FILE|".len() + PATH_HASH_LEN);
        assert!(key.is_path());
        assert_eq!(key.schema(), PATH_MARKER);
    }

    #[test]
    fn path_hash_is_stable_and_case_sensitive() {
        assert_eq!(short_hash("/a/B.txt"), short_hash("/a/B.txt"));
        assert_ne!(short_hash("/a/B.txt"), short_hash("/a/b.txt"));
        assert_ne!(short_hash("/a/b.txt"), short_hash("\\a\\b.txt"));
    }

    #[test]
    fn id_may_contain_separator() {
        let key: SelectionKey = "pages|3|x".parse().unwrap();
        assert_eq!(key, SelectionKey::record("pages", "3|x"));
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!("pages".parse::<SelectionKey>().is_err());
        assert!("|3".parse::<SelectionKey>().is_err());
        assert!("pages|".parse::<SelectionKey>().is_err());
        assert!("".parse::<SelectionKey>().is_err());
    }

    #[test]
    fn keys_serialize_as_json_map_keys() {
        let mut map = indexmap::IndexMap::new();
        map.insert(SelectionKey::record("pages", "1"), "1".to_string());
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"pages|1":"1"}"#);

        let back: indexmap::IndexMap<SelectionKey, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn truthiness_matches_deselect_markers() {
        assert!(is_truthy("1"));
        assert!(is_truthy("/tmp/x"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("0"));
    }
}
