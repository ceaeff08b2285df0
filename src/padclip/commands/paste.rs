//! Paste compilation.
//!
//! Record pastes are emitted in reverse selection order: the record engine
//! places each element "after" the target in turn, so reversing keeps the
//! visible result in the order the user selected. Path pastes keep the
//! selection order.
//!
//! In `Move` mode each key is removed right after its directive is emitted, so
//! an interrupted compilation leaves only the not-yet-emitted tail selected.

use super::view::{selection_view, ItemFilter};
use super::{
    PasteTarget, PathCommandBatch, PathDirective, RecordCommand, RecordCommandBatch, TargetRef,
};
use crate::key::{SelectionKey, KEY_SEPARATOR, PATH_MARKER};
use crate::model::Mode;
use crate::pads::PadStore;
use crate::resolve::SchemaRegistry;
use serde_json::{Map, Value};
use tracing::debug;

/// Adds paste directives for the active pad's records to `batch`.
///
/// `target_ref` is `<schema>|<targetId>`. A negative target means "insert
/// after record `-targetId` of `schema`" and only pastes records of that
/// schema; it needs a schema, otherwise the batch is returned untouched. A
/// non-negative target is a container and receives records of every schema.
/// A [`PATH_MARKER`] target is a folder and never receives records.
pub fn compile_paste_batch(
    store: &mut PadStore,
    schemas: &dyn SchemaRegistry,
    target_ref: &str,
    update: Option<&Map<String, Value>>,
    mut batch: RecordCommandBatch,
) -> RecordCommandBatch {
    let target = TargetRef::parse(target_ref);
    let target_id = target.target_id();

    if target.schema.is_empty() && target_id < 0 {
        debug!(target = target_ref, "skipping paste: insert-after needs a schema");
        return batch;
    }
    if target.schema == PATH_MARKER {
        debug!(target = target_ref, "skipping paste: records cannot go into a folder");
        return batch;
    }

    let filter = if target_id < 0 {
        ItemFilter::parse(target.schema)
    } else {
        ItemFilter::AnyRecord
    };
    let elements: Vec<SelectionKey> = selection_view(store, schemas, filter, None)
        .into_keys()
        .filter(|key| !key.is_path())
        .collect();
    let mode = store.current_mode();

    for key in elements.into_iter().rev() {
        if let SelectionKey::Record { schema, id } = &key {
            batch.insert(
                schema,
                id,
                RecordCommand::paste(mode, PasteTarget::new(target_id, update)),
            );
        }
        if mode == Mode::Move {
            store.remove_from_active(&key);
        }
    }

    batch
}

/// Adds paste directives for the active pad's paths to `batch`.
///
/// `target_ref` is `_FILE|<target>`; without a separator the whole string is
/// the target.
pub fn compile_path_paste_batch(
    store: &mut PadStore,
    schemas: &dyn SchemaRegistry,
    target_ref: &str,
    mut batch: PathCommandBatch,
) -> PathCommandBatch {
    let target = match target_ref.split_once(KEY_SEPARATOR) {
        Some((_, target)) => target,
        None => target_ref,
    };

    let elements = selection_view(store, schemas, ItemFilter::Paths, None);
    let mode = store.current_mode();

    for (key, path) in elements {
        batch.push_paste(
            mode,
            PathDirective {
                data: path,
                target: Some(target.to_string()),
            },
        );
        if mode == Mode::Move {
            store.remove_from_active(&key);
        }
    }

    batch
}
