//! # Pad Store
//!
//! In-memory state of one clipboard session: the default pad (`normal`), the
//! numbered pads (`tab_1` .. `tab_N`), the pointer to the active pad, the lock
//! flag and the dirty flag.
//!
//! ## Invariants
//!
//! - `pads` holds exactly the default pad plus `number_of_tabs` numbered pads.
//! - `current` always names one of them.
//! - A pad's mode only means something while the pad holds items.
//!
//! ## Persisted pointer
//!
//! Two pointers are tracked. `current` is what this session operates on;
//! `stored_current` is what gets written back. They only differ after
//! [`PadStore::lock`], which pins the session to the default pad without
//! forgetting which pad the user had chosen.

use crate::error::Result;
use crate::key::SelectionKey;
use crate::model::{Mode, Pad, PadId, SelectionMark, MAX_TABS};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

const CURRENT_FIELD: &str = "current";

#[derive(Debug, Clone)]
pub struct PadStore {
    number_of_tabs: u8,
    pads: IndexMap<PadId, Pad>,
    current: PadId,
    stored_current: PadId,
    locked: bool,
    dirty: bool,
}

impl Default for PadStore {
    fn default() -> Self {
        Self::initialize(None, 0, None)
    }
}

impl PadStore {
    /// Builds the pads from a stored blob.
    ///
    /// Each pad reuses the stored collection when it has the shape of a pad,
    /// otherwise it starts empty. `tab_count` is clamped to `0..=20`.
    pub fn initialize(stored: Option<&Value>, tab_count: i64, last_current: Option<&str>) -> Self {
        let number_of_tabs = tab_count.clamp(0, MAX_TABS as i64) as u8;

        let mut pads = IndexMap::with_capacity(number_of_tabs as usize + 1);
        pads.insert(PadId::Normal, restore_pad(stored, PadId::Normal));
        for n in 1..=number_of_tabs {
            let id = PadId::Tab(n);
            pads.insert(id, restore_pad(stored, id));
        }

        let current = last_current
            .and_then(|s| s.parse::<PadId>().ok())
            .filter(|id| pads.contains_key(id))
            .unwrap_or(PadId::Normal);

        debug!(tabs = number_of_tabs, current = %current, "clipboard initialized");

        Self {
            number_of_tabs,
            pads,
            current,
            stored_current: current,
            locked: false,
            dirty: false,
        }
    }

    /// Pins the session to the default pad. Pad switches are ignored afterwards.
    pub fn lock(&mut self) {
        self.locked = true;
        self.current = PadId::Normal;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn number_of_tabs(&self) -> u8 {
        self.number_of_tabs
    }

    pub fn current(&self) -> PadId {
        self.current
    }

    /// The pad pointer that will be persisted.
    pub fn stored_current(&self) -> PadId {
        self.stored_current
    }

    /// Moves the session pointer. Callers check the target exists.
    pub(crate) fn set_current(&mut self, id: PadId) {
        self.current = id;
        self.stored_current = id;
    }

    pub fn pad_ids(&self) -> impl Iterator<Item = PadId> + '_ {
        self.pads.keys().copied()
    }

    pub fn pad(&self, id: PadId) -> Option<&Pad> {
        self.pads.get(&id)
    }

    pub fn pad_mut(&mut self, id: PadId) -> Option<&mut Pad> {
        self.pads.get_mut(&id)
    }

    pub fn active(&self) -> &Pad {
        // `current` always names an existing pad
        &self.pads[&self.current]
    }

    pub fn active_mut(&mut self) -> &mut Pad {
        let current = self.current;
        self.pads.entry(current).or_default()
    }

    /// Removes a key from the active pad. Returns whether it was present.
    pub fn remove_from_active(&mut self, key: &SelectionKey) -> bool {
        self.dirty = true;
        self.active_mut().remove(key).is_some()
    }

    pub fn has_items_anywhere(&self) -> bool {
        self.pads.values().any(|pad| !pad.is_empty())
    }

    pub fn has_items_in_active_pad(&self) -> bool {
        !self.active().is_empty()
    }

    pub fn current_mode(&self) -> Mode {
        self.active().mode
    }

    /// Whether a record is selected on the active pad.
    pub fn is_selected(&self, schema: &str, id: &str) -> Option<SelectionMark> {
        let key = SelectionKey::record(schema, id);
        if !self.active().contains_selected(&key) {
            return None;
        }
        if self.current.is_normal() {
            Some(SelectionMark::Mode(self.current_mode()))
        } else {
            Some(SelectionMark::Selected)
        }
    }

    /// Serializes the pads and the persisted pointer into a storage blob.
    pub fn to_blob(&self) -> Result<Value> {
        let mut map = Map::new();
        for (id, pad) in &self.pads {
            map.insert(id.to_string(), serde_json::to_value(pad)?);
        }
        map.insert(
            CURRENT_FIELD.to_string(),
            Value::String(self.stored_current.to_string()),
        );
        Ok(Value::Object(map))
    }
}

/// Reads the persisted pad pointer out of a stored blob.
pub fn stored_pointer(stored: Option<&Value>) -> Option<&str> {
    stored?.get(CURRENT_FIELD)?.as_str()
}

fn restore_pad(stored: Option<&Value>, id: PadId) -> Pad {
    let Some(raw) = stored.and_then(|blob| blob.get(id.to_string())) else {
        return Pad::default();
    };
    match serde_json::from_value::<Pad>(raw.clone()) {
        Ok(pad) => pad,
        Err(e) => {
            warn!(pad = %id, error = %e, "discarding malformed stored pad");
            Pad::default()
        }
    }
}
