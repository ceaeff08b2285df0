use super::view::{selection_view, ItemFilter};
use super::{PathCommandBatch, PathDirective, RecordCommand, RecordCommandBatch};
use crate::key::SelectionKey;
use crate::pads::PadStore;
use crate::resolve::SchemaRegistry;

/// Adds a delete directive for every visible record of the active pad and
/// removes it from the selection, whatever the mode.
pub fn compile_delete_batch(
    store: &mut PadStore,
    schemas: &dyn SchemaRegistry,
    mut batch: RecordCommandBatch,
) -> RecordCommandBatch {
    let elements = selection_view(store, schemas, ItemFilter::AnyRecord, None);

    for key in elements.into_keys() {
        if let SelectionKey::Record { schema, id } = &key {
            batch.insert(schema, id, RecordCommand::delete());
        }
        store.remove_from_active(&key);
    }

    batch
}

/// Path counterpart of [`compile_delete_batch`].
pub fn compile_path_delete_batch(
    store: &mut PadStore,
    schemas: &dyn SchemaRegistry,
    mut batch: PathCommandBatch,
) -> PathCommandBatch {
    let elements = selection_view(store, schemas, ItemFilter::Paths, None);

    for (key, path) in elements {
        batch.delete.push(PathDirective {
            data: path,
            target: None,
        });
        store.remove_from_active(&key);
    }

    batch
}
