//! Selection mutations: toggles, mode, removal, clearing and pad switching.
//!
//! The default pad is single-slot. Every toggle applied while it is active
//! first empties it, so a batch of several toggles leaves only the effect of
//! the last one. Numbered pads accumulate.

use crate::key::{is_truthy, short_hash, SelectionKey, PATH_MARKER};
use crate::model::{Mode, PadId, RECORD_MARKER};
use crate::pads::PadStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One select/deselect request. A missing or falsy payload deselects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleEntry {
    pub key: SelectionKey,
    #[serde(default)]
    pub payload: Option<String>,
}

impl ToggleEntry {
    pub fn select_record(schema: &str, id: &str) -> Self {
        Self {
            key: SelectionKey::record(schema, id),
            payload: Some(RECORD_MARKER.to_string()),
        }
    }

    pub fn select_path(path: &str) -> Self {
        Self {
            key: SelectionKey::path(path),
            payload: Some(path.to_string()),
        }
    }

    pub fn deselect(key: SelectionKey) -> Self {
        Self { key, payload: None }
    }

    pub fn is_selecting(&self) -> bool {
        self.payload.as_deref().is_some_and(is_truthy)
    }
}

/// A bundle of clipboard requests as submitted by a front-end.
///
/// Applied in a fixed order: toggles, pad switch, single removal, pad clear,
/// copy mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardCommand {
    pub toggles: Vec<ToggleEntry>,
    pub switch_pad: Option<String>,
    pub remove: Option<SelectionKey>,
    pub clear_pad: Option<String>,
    pub copy_mode: Option<bool>,
}

pub fn apply_command(store: &mut PadStore, command: &ClipboardCommand) {
    if !command.toggles.is_empty() {
        apply_toggle_batch(store, &command.toggles);
    }
    if let Some(pad) = command.switch_pad.as_deref().filter(|p| !p.is_empty()) {
        switch_pad(store, pad);
    }
    if let Some(key) = &command.remove {
        remove_key(store, key);
    }
    if let Some(pad) = command.clear_pad.as_deref().filter(|p| !p.is_empty()) {
        clear_pad(store, pad);
    }
    if let Some(copy) = command.copy_mode {
        set_mode(store, copy);
    }
}

pub fn apply_toggle_batch(store: &mut PadStore, entries: &[ToggleEntry]) {
    for entry in entries {
        if store.current().is_normal() {
            store.active_mut().clear();
        }
        match entry.payload.as_deref() {
            Some(payload) if is_truthy(payload) => {
                store
                    .active_mut()
                    .insert(entry.key.clone(), payload.to_string());
            }
            _ => {
                store.active_mut().remove(&entry.key);
            }
        }
        store.mark_dirty();
    }
}

/// Copy mode only sticks while the active pad holds items.
pub fn set_mode(store: &mut PadStore, copy: bool) {
    let has_items = store.has_items_in_active_pad();
    store.active_mut().mode = if copy && has_items {
        Mode::Copy
    } else {
        Mode::Move
    };
    store.mark_dirty();
}

pub fn remove_key(store: &mut PadStore, key: &SelectionKey) {
    store.remove_from_active(key);
}

/// Empties the named pad. Unknown pads are ignored.
pub fn clear_pad(store: &mut PadStore, pad: &str) {
    let Ok(id) = pad.parse::<PadId>() else {
        return;
    };
    if let Some(target) = store.pad_mut(id) {
        target.clear();
        store.mark_dirty();
    }
}

/// Changes the active pad unless the store is locked.
///
/// The landing pad falls back to `Move` unless it is the default pad and
/// still holds items.
pub fn switch_pad(store: &mut PadStore, pad: &str) {
    if store.is_locked() || store.current().to_string() == pad {
        return;
    }

    if let Ok(id) = pad.parse::<PadId>() {
        if store.pad(id).is_some() {
            store.set_current(id);
            debug!(pad = %id, "switched pad");
        }
    }

    if !store.current().is_normal() || !store.has_items_in_active_pad() {
        store.active_mut().mode = Mode::Move;
    }
    store.mark_dirty();
}

/// Input boundary for untrusted toggles.
///
/// Keeps entries whose key starts with `expected_schema` (use
/// [`PATH_MARKER`] for files), drops keys that do not decode, and with
/// `drop_deselected` also drops deselect entries.
///
/// The key kind has to match the expected schema: path keys are only accepted
/// for [`PATH_MARKER`], and a selecting path entry must carry the path its key
/// was hashed from.
pub fn sanitize_toggles<I>(raw: I, expected_schema: &str, drop_deselected: bool) -> Vec<ToggleEntry>
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    let expects_paths = expected_schema == PATH_MARKER;
    raw.into_iter()
        .filter_map(|(key, payload)| {
            let key: SelectionKey = key.parse().ok()?;
            if key.is_path() != expects_paths || key.schema() != expected_schema {
                return None;
            }
            let entry = ToggleEntry { key, payload };
            if let (SelectionKey::Path { hash }, Some(path)) = (&entry.key, entry.payload.as_deref()) {
                if is_truthy(path) && *hash != short_hash(path) {
                    return None;
                }
            }
            if drop_deselected && !entry.is_selecting() {
                return None;
            }
            Some(entry)
        })
        .collect()
}
