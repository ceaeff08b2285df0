//! # Storage Layer
//!
//! The clipboard is persisted per user as one JSON blob. The [`ClipboardStorage`]
//! trait hides where that blob lives.
//!
//! ## Scope Pattern
//!
//! Every call takes a [`Scope`]:
//! - `Scope::Session`: dropped when the session store is wiped (temp dir).
//! - `Scope::Persistent`: kept across sessions (user data dir).
//!
//! Which one applies is a user preference (`persistent` in the config); the
//! clipboard itself does not care.
//!
//! ## Implementations
//!
//! - [`fs::FileStorage`]: production storage, one `clipboard-{user}.json` per scope.
//! - [`memory::InMemoryStorage`]: for tests, no filesystem access.
//!
//! ## Blob Layout
//!
//! ```text
//! {
//!   "normal": { "el": { "<key>": "<payload>", ... }, "mode": "move" | "copy" },
//!   "tab_1":  { ... },
//!   "current": "tab_1"
//! }
//! ```
//!
//! Storage treats the blob as opaque; shape checks happen in
//! [`PadStore::initialize`](crate::pads::PadStore::initialize).

use crate::error::{ClipError, Result};
use serde_json::Value;
use std::str::FromStr;

pub mod fs;
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Session,
    Persistent,
}

impl Scope {
    pub fn from_preference(persistent: bool) -> Self {
        if persistent {
            Scope::Persistent
        } else {
            Scope::Session
        }
    }
}

/// Identifies whose clipboard is loaded. Restricted to characters that are
/// safe in file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserKey(String);

impl UserKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserKey {
    type Err = ClipError;

    fn from_str(s: &str) -> Result<Self> {
        let valid = !s.is_empty()
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !s.starts_with('.');
        if valid {
            Ok(UserKey(s.to_string()))
        } else {
            Err(ClipError::Api(format!("Invalid user key: {}", s)))
        }
    }
}

impl std::fmt::Display for UserKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Abstract interface for clipboard persistence.
pub trait ClipboardStorage {
    /// Load the stored blob. `Ok(None)` when nothing was saved yet.
    fn load(&self, user: &UserKey, scope: Scope) -> Result<Option<Value>>;

    /// Replace the stored blob. Last write wins.
    fn save(&mut self, user: &UserKey, scope: Scope, blob: &Value) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_key_accepts_file_safe_names() {
        assert!("alice".parse::<UserKey>().is_ok());
        assert!("be_user-12.a".parse::<UserKey>().is_ok());
        assert!("".parse::<UserKey>().is_err());
        assert!("../etc".parse::<UserKey>().is_err());
        assert!(".hidden".parse::<UserKey>().is_err());
        assert!("a/b".parse::<UserKey>().is_err());
    }

    #[test]
    fn scope_follows_preference() {
        assert_eq!(Scope::from_preference(true), Scope::Persistent);
        assert_eq!(Scope::from_preference(false), Scope::Session);
    }
}
