//! # Padclip Architecture
//!
//! Padclip is a **selection clipboard library**. It remembers which records and
//! files a user has picked, across a default pad and a configurable number of
//! numbered pads, and turns that selection into ordered move/copy/delete
//! batches for an external engine to execute. It never moves a record or a
//! file itself.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, prints views and batches               │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - ClipboardController: one session, load → mutate → save   │
//! │  - Owns the collaborators (schemas, records, paths)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Selection mutations, views, pruning, batch compilation   │
//! │  - Operates on a PadStore, no I/O                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ClipboardStorage trait, one JSON blob per user and scope │
//! │  - FileStorage (production), InMemoryStorage (testing)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Selection Keys
//!
//! Every selected item is a [`key::SelectionKey`]: either a record
//! (`schema|id`) or a path (`_FILE|<hash>`). The string form only exists at the
//! storage and input boundaries; inside the crate the key is a tagged enum.
//!
//! ## Testing Strategy
//!
//! 1. **Commands**: unit tests against a bare [`pads::PadStore`].
//! 2. **API**: controller tests over `InMemoryStorage` and fake resolvers
//!    (`fixtures` modules, also exported with the `test_utils` feature).
//! 3. **CLI**: `tests/` drives the binary against a temporary home.
//!
//! ## Module Overview
//!
//! - [`api`]: The controller facade
//! - [`commands`]: Selection logic and batch compilation
//! - [`pads`]: In-memory pad state and its blob codec
//! - [`model`]: `Pad`, `PadId`, `Mode`
//! - [`key`]: Selection keys and path hashing
//! - [`resolve`]: Schema, record and path collaborator traits
//! - [`store`]: Storage abstraction and implementations
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod key;
pub mod model;
pub mod pads;
pub mod resolve;
pub mod store;
