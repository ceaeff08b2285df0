//! # Command Layer
//!
//! Business logic over a [`PadStore`](crate::pads::PadStore). Functions here
//! take the state and the collaborators they need as plain arguments and
//! return plain Rust types; persistence is the controller's job.
//!
//! The output types ([`RecordCommandBatch`], [`PathCommandBatch`]) are what the
//! downstream record and file engines consume. Both serialize to the shapes
//! those engines expect:
//!
//! ```text
//! records: { "tt_content": { "7": { "move": 30 }, "5": { "move": 30 } } }
//! paths:   { "copy": [ { "data": "/srv/a.txt", "target": "1:/dest/" } ] }
//! ```

use crate::key::KEY_SEPARATOR;
use crate::model::Mode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod delete;
pub mod paste;
pub mod prune;
pub mod select;
pub mod view;

/// Per-record directive for the record engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordCommand {
    Move(PasteTarget),
    Copy(PasteTarget),
    Delete(bool),
}

impl RecordCommand {
    pub fn paste(mode: Mode, target: PasteTarget) -> Self {
        match mode {
            Mode::Move => RecordCommand::Move(target),
            Mode::Copy => RecordCommand::Copy(target),
        }
    }

    pub fn delete() -> Self {
        RecordCommand::Delete(true)
    }
}

/// Destination of a paste: a bare target id, or the target plus an update
/// overlay applied to the pasted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PasteTarget {
    Id(i64),
    Overlay(PasteOverlay),
}

impl PasteTarget {
    pub fn new(target: i64, update: Option<&Map<String, Value>>) -> Self {
        match update {
            Some(update) => PasteTarget::Overlay(PasteOverlay {
                action: "paste".to_string(),
                target,
                update: update.clone(),
            }),
            None => PasteTarget::Id(target),
        }
    }

    pub fn target(&self) -> i64 {
        match self {
            PasteTarget::Id(id) => *id,
            PasteTarget::Overlay(overlay) => overlay.target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasteOverlay {
    pub action: String,
    pub target: i64,
    pub update: Map<String, Value>,
}

/// schema → record id → directive, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordCommandBatch {
    schemas: IndexMap<String, IndexMap<String, RecordCommand>>,
}

impl RecordCommandBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, schema: &str, id: &str, command: RecordCommand) {
        self.schemas
            .entry(schema.to_string())
            .or_default()
            .insert(id.to_string(), command);
    }

    pub fn get(&self, schema: &str, id: &str) -> Option<&RecordCommand> {
        self.schemas.get(schema)?.get(id)
    }

    /// Record ids of one schema in emission order.
    pub fn ids(&self, schema: &str) -> Vec<&str> {
        self.schemas
            .get(schema)
            .map(|ids| ids.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn schemas(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One path directive for the file engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathDirective {
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCommandBatch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub copy: Vec<PathDirective>,
    #[serde(rename = "move", default, skip_serializing_if = "Vec::is_empty")]
    pub moves: Vec<PathDirective>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delete: Vec<PathDirective>,
}

impl PathCommandBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_paste(&mut self, mode: Mode, directive: PathDirective) {
        match mode {
            Mode::Move => self.moves.push(directive),
            Mode::Copy => self.copy.push(directive),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.copy.is_empty() && self.moves.is_empty() && self.delete.is_empty()
    }
}

/// A paste destination of the form `<schema>|<target>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef<'a> {
    pub schema: &'a str,
    pub target: &'a str,
}

impl<'a> TargetRef<'a> {
    /// Splits at the first separator. Without one, the whole input is the schema.
    pub fn parse(input: &'a str) -> Self {
        match input.split_once(KEY_SEPARATOR) {
            Some((schema, target)) => Self { schema, target },
            None => Self {
                schema: input,
                target: "",
            },
        }
    }

    /// Numeric target id. Missing or non-numeric targets read as `0`.
    pub fn target_id(&self) -> i64 {
        self.target.trim().parse().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_batch_serializes_engine_shape() {
        let mut batch = RecordCommandBatch::new();
        batch.insert("tt_content", "7", RecordCommand::paste(Mode::Move, PasteTarget::Id(30)));
        batch.insert("pages", "3", RecordCommand::delete());

        assert_eq!(
            serde_json::to_value(&batch).unwrap(),
            json!({ "tt_content": { "7": { "move": 30 } }, "pages": { "3": { "delete": true } } })
        );
    }

    #[test]
    fn overlay_target_serializes_paste_action() {
        let update = json!({ "colPos": 2 }).as_object().cloned().unwrap();
        let command = RecordCommand::paste(Mode::Copy, PasteTarget::new(-12, Some(&update)));

        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({ "copy": { "action": "paste", "target": -12, "update": { "colPos": 2 } } })
        );
    }

    #[test]
    fn path_batch_skips_empty_lists() {
        let mut batch = PathCommandBatch::new();
        batch.push_paste(
            Mode::Move,
            PathDirective {
                data: "/srv/a.txt".into(),
                target: Some("1:/dest/".into()),
            },
        );
        assert_eq!(
            serde_json::to_value(&batch).unwrap(),
            json!({ "move": [ { "data": "/srv/a.txt", "target": "1:/dest/" } ] })
        );
    }

    #[test]
    fn target_ref_parsing() {
        let r = TargetRef::parse("pages|30");
        assert_eq!((r.schema, r.target_id()), ("pages", 30));

        let r = TargetRef::parse("|-5");
        assert_eq!((r.schema, r.target_id()), ("", -5));

        let r = TargetRef::parse("tt_content");
        assert_eq!((r.schema, r.target_id()), ("tt_content", 0));

        assert_eq!(TargetRef::parse("pages|abc").target_id(), 0);
    }
}
