use crate::error::Result;
use crate::key::{is_truthy, SelectionKey};
use crate::pads::PadStore;
use crate::resolve::{PathResolver, PathStatus, RecordResolver};
use tracing::debug;

/// Drops entries of the active pad whose referent no longer resolves.
///
/// Returns the number of removed entries. A path resolver failure other than
/// "not found" aborts the scan and is returned as is; entries pruned before
/// that point stay pruned.
pub fn prune_active_pad(
    store: &mut PadStore,
    records: &dyn RecordResolver,
    paths: &dyn PathResolver,
) -> Result<usize> {
    let entries: Vec<(SelectionKey, String)> = store
        .active()
        .items
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let mut pruned = 0;
    for (key, payload) in entries {
        let stale = match &key {
            SelectionKey::Record { schema, id } => {
                !is_truthy(&payload) || !records.exists(schema, id)
            }
            SelectionKey::Path { .. } => {
                !is_truthy(&payload) || paths.resolve(&payload)? == PathStatus::NotFound
            }
        };

        if stale {
            debug!(key = %key, "pruning stale selection");
            store.remove_from_active(&key);
            pruned += 1;
        }
    }

    Ok(pruned)
}
