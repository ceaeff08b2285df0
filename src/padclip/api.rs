//! # API Facade
//!
//! [`ClipboardController`] is the single entry point for a clipboard session.
//! It owns the [`PadStore`] for the duration of one request and dispatches to
//! the command layer.
//!
//! ## Session Lifecycle
//!
//! ```text
//! initialize ──► [lock] ──► apply / toggle / switch / mode ──► compile ──► end_session
//!    load blob                      mutate, set dirty            batches     save if dirty
//! ```
//!
//! Nothing is written until [`ClipboardController::end_session`], and only if a
//! mutation set the dirty flag. Dropping the controller without calling it
//! discards the session's changes.
//!
//! ## Explicit Context
//!
//! Who the clipboard belongs to ([`UserKey`]), where it is stored ([`Scope`])
//! and how records, schemas and paths are resolved ([`Collaborators`]) are all
//! handed in at construction. The controller never looks anything up on its own.
//!
//! ## Generic Over ClipboardStorage
//!
//! - Production: `ClipboardController<FileStorage>`
//! - Testing: `ClipboardController<InMemoryStorage>`

use crate::commands::{self, PathCommandBatch, RecordCommandBatch};
use crate::config::ClipboardConfig;
use crate::error::Result;
use crate::key::{RecordRef, SelectionKey};
use crate::model::{Mode, PadId, SelectionMark};
use crate::pads::{stored_pointer, PadStore};
use crate::resolve::Collaborators;
use crate::store::{ClipboardStorage, Scope, UserKey};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info};

pub use crate::commands::select::{ClipboardCommand, ToggleEntry};
pub use crate::commands::view::{ItemFilter, PadSummary};

pub struct ClipboardController<S: ClipboardStorage> {
    storage: S,
    user: UserKey,
    scope: Scope,
    pads: PadStore,
    collaborators: Collaborators,
}

impl<S: ClipboardStorage> ClipboardController<S> {
    /// Loads the user's clipboard from storage.
    pub fn initialize(
        storage: S,
        user: UserKey,
        config: &ClipboardConfig,
        collaborators: Collaborators,
    ) -> Result<Self> {
        let scope = Scope::from_preference(config.persistent);
        let stored = storage.load(&user, scope)?;
        let pads = PadStore::initialize(
            stored.as_ref(),
            config.pad_count() as i64,
            stored_pointer(stored.as_ref()),
        );
        debug!(user = %user, ?scope, "clipboard session started");

        Ok(Self {
            storage,
            user,
            scope,
            pads,
            collaborators,
        })
    }

    /// Restricts this session to the default pad.
    pub fn lock(&mut self) {
        self.pads.lock();
    }

    pub fn apply(&mut self, command: &ClipboardCommand) {
        commands::select::apply_command(&mut self.pads, command);
    }

    pub fn apply_toggle_batch(&mut self, entries: &[ToggleEntry]) {
        commands::select::apply_toggle_batch(&mut self.pads, entries);
    }

    pub fn set_mode(&mut self, copy: bool) {
        commands::select::set_mode(&mut self.pads, copy);
    }

    pub fn remove_key(&mut self, key: &SelectionKey) {
        commands::select::remove_key(&mut self.pads, key);
    }

    pub fn clear_pad(&mut self, pad: &str) {
        commands::select::clear_pad(&mut self.pads, pad);
    }

    pub fn switch_pad(&mut self, pad: &str) {
        commands::select::switch_pad(&mut self.pads, pad);
    }

    pub fn prune_active_pad(&mut self) -> Result<usize> {
        commands::prune::prune_active_pad(
            &mut self.pads,
            self.collaborators.records.as_ref(),
            self.collaborators.paths.as_ref(),
        )
    }

    /// Selected items of a pad (default: active). `kind` is `""`, a schema
    /// name or `_FILE`.
    pub fn selection_view(&self, kind: &str, pad: Option<PadId>) -> IndexMap<SelectionKey, String> {
        commands::view::selection_view(
            &self.pads,
            self.collaborators.schemas.as_ref(),
            ItemFilter::parse(kind),
            pad,
        )
    }

    pub fn compile_paste_batch(
        &mut self,
        target_ref: &str,
        update: Option<&Map<String, Value>>,
    ) -> RecordCommandBatch {
        commands::paste::compile_paste_batch(
            &mut self.pads,
            self.collaborators.schemas.as_ref(),
            target_ref,
            update,
            RecordCommandBatch::new(),
        )
    }

    pub fn compile_delete_batch(&mut self) -> RecordCommandBatch {
        commands::delete::compile_delete_batch(
            &mut self.pads,
            self.collaborators.schemas.as_ref(),
            RecordCommandBatch::new(),
        )
    }

    pub fn compile_path_paste_batch(&mut self, target_ref: &str) -> PathCommandBatch {
        commands::paste::compile_path_paste_batch(
            &mut self.pads,
            self.collaborators.schemas.as_ref(),
            target_ref,
            PathCommandBatch::new(),
        )
    }

    pub fn compile_path_delete_batch(&mut self) -> PathCommandBatch {
        commands::delete::compile_path_delete_batch(
            &mut self.pads,
            self.collaborators.schemas.as_ref(),
            PathCommandBatch::new(),
        )
    }

    pub fn has_items_anywhere(&self) -> bool {
        self.pads.has_items_anywhere()
    }

    pub fn has_items_in_active_pad(&self) -> bool {
        self.pads.has_items_in_active_pad()
    }

    pub fn current_mode(&self) -> Mode {
        self.pads.current_mode()
    }

    pub fn is_selected(&self, schema: &str, id: &str) -> Option<SelectionMark> {
        self.pads.is_selected(schema, id)
    }

    pub fn first_selected_record(&self, explicit: Option<&RecordRef>) -> Option<RecordRef> {
        commands::view::first_selected_record(
            &self.pads,
            self.collaborators.schemas.as_ref(),
            explicit,
        )
    }

    pub fn record_refs(&self) -> Vec<RecordRef> {
        commands::view::record_refs(&self.pads, self.collaborators.schemas.as_ref())
    }

    pub fn pad_summaries(&self, paths: bool) -> Vec<PadSummary> {
        commands::view::pad_summaries(&self.pads, self.collaborators.schemas.as_ref(), paths)
    }

    pub fn pads(&self) -> &PadStore {
        &self.pads
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persists the clipboard if anything changed. Returns whether it saved.
    pub fn end_session(&mut self) -> Result<bool> {
        if !self.pads.is_dirty() {
            return Ok(false);
        }
        let blob = self.pads.to_blob()?;
        self.storage.save(&self.user, self.scope, &blob)?;
        self.pads.clear_dirty();
        info!(user = %self.user, "clipboard persisted");
        Ok(true)
    }
}
