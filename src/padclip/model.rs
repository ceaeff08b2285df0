use crate::error::{ClipError, Result};
use crate::key::{is_truthy, SelectionKey};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Upper bound for the number of numbered pads.
pub const MAX_TABS: u8 = 20;

/// Payload stored for record keys. Only its presence matters.
pub const RECORD_MARKER: &str = "1";

/// Identifies a pad: the default single-slot pad or a numbered one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PadId {
    Normal,
    Tab(u8),
}

impl PadId {
    pub fn is_normal(&self) -> bool {
        matches!(self, PadId::Normal)
    }
}

impl std::fmt::Display for PadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PadId::Normal => write!(f, "normal"),
            PadId::Tab(n) => write!(f, "tab_{}", n),
        }
    }
}

impl FromStr for PadId {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "normal" {
            return Ok(PadId::Normal);
        }
        if let Some(rest) = s.strip_prefix("tab_") {
            if let Ok(n) = rest.parse::<u8>() {
                // only the canonical spelling names a pad
                if n >= 1 && n.to_string() == rest {
                    return Ok(PadId::Tab(n));
                }
            }
        }
        Err(ClipError::Api(format!("Invalid pad id: {}", s)))
    }
}

/// Whether a paste consumes the selection (`Move`) or leaves it (`Copy`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    #[serde(alias = "")]
    Move,
    Copy,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Move => "move",
            Mode::Copy => "copy",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "move" | "cut" | "" => Ok(Mode::Move),
            "copy" => Ok(Mode::Copy),
            other => Err(ClipError::Api(format!("Invalid mode: {}", other))),
        }
    }
}

/// One holding area. Insertion order of `items` is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pad {
    #[serde(rename = "el", default)]
    pub items: IndexMap<SelectionKey, String>,
    #[serde(default)]
    pub mode: Mode,
}

impl Pad {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Inserts at the tail; an existing key keeps its position.
    pub fn insert(&mut self, key: SelectionKey, payload: String) {
        self.items.insert(key, payload);
    }

    pub fn remove(&mut self, key: &SelectionKey) -> Option<String> {
        self.items.shift_remove(key)
    }

    pub fn contains_selected(&self, key: &SelectionKey) -> bool {
        self.items.get(key).is_some_and(|v| is_truthy(v))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.mode = Mode::Move;
    }
}

/// Answer of `is_selected`: the default pad reports its mode, numbered pads
/// only report presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMark {
    Mode(Mode),
    Selected,
}

impl std::fmt::Display for SelectionMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionMark::Mode(mode) => write!(f, "{}", mode),
            SelectionMark::Selected => write!(f, "selected"),
        }
    }
}
