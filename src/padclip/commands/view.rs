//! Filtered, order-preserving views over a pad.
//!
//! Path items only show up when asked for explicitly; an unrestricted view
//! returns records only. Records whose schema the registry no longer knows are
//! hidden but stay stored.

use crate::key::{is_truthy, RecordRef, SelectionKey, PATH_MARKER};
use crate::model::{Mode, PadId};
use crate::pads::PadStore;
use crate::resolve::SchemaRegistry;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFilter<'a> {
    AnyRecord,
    Schema(&'a str),
    Paths,
}

impl<'a> ItemFilter<'a> {
    /// `""` is every record, [`PATH_MARKER`] is paths, anything else a schema.
    pub fn parse(kind: &'a str) -> Self {
        match kind {
            "" => ItemFilter::AnyRecord,
            PATH_MARKER => ItemFilter::Paths,
            schema => ItemFilter::Schema(schema),
        }
    }

    fn accepts(&self, key: &SelectionKey, schemas: &dyn SchemaRegistry) -> bool {
        match (self, key) {
            (ItemFilter::Paths, SelectionKey::Path { .. }) => true,
            (ItemFilter::Paths, SelectionKey::Record { .. }) => false,
            (_, SelectionKey::Path { .. }) => false,
            (ItemFilter::AnyRecord, SelectionKey::Record { schema, .. }) => {
                schemas.is_known_schema(schema)
            }
            (ItemFilter::Schema(wanted), SelectionKey::Record { schema, .. }) => {
                schema == wanted && schemas.is_known_schema(schema)
            }
        }
    }
}

/// Selected items of `pad` (default: the active pad) matching `filter`.
pub fn selection_view(
    store: &PadStore,
    schemas: &dyn SchemaRegistry,
    filter: ItemFilter<'_>,
    pad: Option<PadId>,
) -> IndexMap<SelectionKey, String> {
    let pad_id = pad.unwrap_or_else(|| store.current());
    let Some(pad) = store.pad(pad_id) else {
        return IndexMap::new();
    };

    pad.items
        .iter()
        .filter(|(key, payload)| is_truthy(payload) && filter.accepts(key, schemas))
        .map(|(key, payload)| (key.clone(), payload.clone()))
        .collect()
}

/// Records of the active pad in selection order.
pub fn record_refs(store: &PadStore, schemas: &dyn SchemaRegistry) -> Vec<RecordRef> {
    selection_view(store, schemas, ItemFilter::AnyRecord, None)
        .keys()
        .filter_map(SelectionKey::as_record)
        .collect()
}

/// The explicit record if it is selected, otherwise the first selected record.
pub fn first_selected_record(
    store: &PadStore,
    schemas: &dyn SchemaRegistry,
    explicit: Option<&RecordRef>,
) -> Option<RecordRef> {
    let candidate = match explicit {
        Some(record) => record.clone(),
        None => record_refs(store, schemas).into_iter().next()?,
    };
    store
        .is_selected(&candidate.schema, &candidate.id)
        .map(|_| candidate)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadSummary {
    pub id: PadId,
    pub items: usize,
    pub mode: Mode,
    pub is_current: bool,
}

/// Per-pad counts for a listing. `paths` switches between path and record items.
pub fn pad_summaries(store: &PadStore, schemas: &dyn SchemaRegistry, paths: bool) -> Vec<PadSummary> {
    let filter = if paths {
        ItemFilter::Paths
    } else {
        ItemFilter::AnyRecord
    };
    store
        .pad_ids()
        .map(|id| PadSummary {
            id,
            items: selection_view(store, schemas, filter, Some(id)).len(),
            mode: store.pad(id).map(|p| p.mode).unwrap_or_default(),
            is_current: id == store.current(),
        })
        .collect()
}
