use super::{ClipboardStorage, Scope, UserKey};
use crate::error::{ClipError, Result};
use serde_json::Value;
use std::collections::HashMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStorage {
    blobs: HashMap<(Scope, UserKey), Value>,
    saves: usize,
    simulate_write_error: bool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn blob(&self, user: &UserKey, scope: Scope) -> Option<&Value> {
        self.blobs.get(&(scope, user.clone()))
    }
}

impl ClipboardStorage for InMemoryStorage {
    fn load(&self, user: &UserKey, scope: Scope) -> Result<Option<Value>> {
        Ok(self.blobs.get(&(scope, user.clone())).cloned())
    }

    fn save(&mut self, user: &UserKey, scope: Scope, blob: &Value) -> Result<()> {
        if self.simulate_write_error {
            return Err(ClipError::Store("Simulated write error".to_string()));
        }
        self.blobs.insert((scope, user.clone()), blob.clone());
        self.saves += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use serde_json::json;

    pub struct StorageFixture {
        pub storage: InMemoryStorage,
        pub user: UserKey,
    }

    impl Default for StorageFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StorageFixture {
        pub fn new() -> Self {
            Self {
                storage: InMemoryStorage::new(),
                user: "tester".parse().unwrap(),
            }
        }

        pub fn with_blob(mut self, scope: Scope, blob: Value) -> Self {
            self.storage.blobs.insert((scope, self.user.clone()), blob);
            self
        }

        /// A numbered pad holding two content records, selected in order 5, 7.
        pub fn with_selected_records(self, scope: Scope) -> Self {
            self.with_blob(
                scope,
                json!({
                    "normal": { "el": {}, "mode": "move" },
                    "tab_1": { "el": { "tt_content|5": "1", "tt_content|7": "1" }, "mode": "move" },
                    "current": "tab_1"
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stores_per_user_and_scope() {
        let mut storage = InMemoryStorage::new();
        let alice: UserKey = "alice".parse().unwrap();
        let bob: UserKey = "bob".parse().unwrap();

        storage
            .save(&alice, Scope::Session, &json!({ "current": "normal" }))
            .unwrap();

        assert!(storage.load(&alice, Scope::Session).unwrap().is_some());
        assert!(storage.load(&alice, Scope::Persistent).unwrap().is_none());
        assert!(storage.load(&bob, Scope::Session).unwrap().is_none());
        assert_eq!(storage.save_count(), 1);
    }

    #[test]
    fn simulated_write_error() {
        let mut storage = InMemoryStorage::new();
        storage.set_simulate_write_error(true);
        let user: UserKey = "alice".parse().unwrap();
        assert!(storage.save(&user, Scope::Session, &json!({})).is_err());
        assert_eq!(storage.save_count(), 0);
    }
}
