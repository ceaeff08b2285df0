use super::{ClipboardStorage, Scope, UserKey};
use crate::error::{ClipError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileStorage {
    session_root: Option<PathBuf>,
    persistent_root: PathBuf,
}

impl FileStorage {
    pub fn new(session_root: Option<PathBuf>, persistent_root: PathBuf) -> Self {
        Self {
            session_root,
            persistent_root,
        }
    }

    fn clipboard_filename(user: &UserKey) -> String {
        format!("clipboard-{}.json", user)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(ClipError::Io)?;
        }
        Ok(())
    }

    fn get_store_path(&self, scope: Scope) -> Result<PathBuf> {
        let root = match scope {
            Scope::Session => self.session_root.as_ref().ok_or_else(|| {
                ClipError::Store("No session storage available".to_string())
            })?,
            Scope::Persistent => &self.persistent_root,
        };
        Ok(root.clone())
    }

    /// Full path of the blob for a user and scope.
    pub fn clipboard_path(&self, user: &UserKey, scope: Scope) -> Result<PathBuf> {
        Ok(self
            .get_store_path(scope)?
            .join(Self::clipboard_filename(user)))
    }
}

impl ClipboardStorage for FileStorage {
    fn load(&self, user: &UserKey, scope: Scope) -> Result<Option<Value>> {
        let path = self.clipboard_path(user, scope)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(ClipError::Io)?;
        let blob: Value = serde_json::from_str(&content).map_err(ClipError::Serialization)?;
        Ok(Some(blob))
    }

    fn save(&mut self, user: &UserKey, scope: Scope, blob: &Value) -> Result<()> {
        let root = self.get_store_path(scope)?;
        self.ensure_dir(&root)?;

        let path = root.join(Self::clipboard_filename(user));
        let tmp = root.join(format!("{}.tmp", Self::clipboard_filename(user)));
        let content = serde_json::to_string_pretty(blob).map_err(ClipError::Serialization)?;

        // atomic replace: write tmp, then rename over the blob
        fs::write(&tmp, content).map_err(ClipError::Io)?;
        fs::rename(&tmp, &path).map_err(ClipError::Io)?;

        debug!(path = %path.display(), "clipboard saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, TempDir, FileStorage) {
        let session = TempDir::new().unwrap();
        let persistent = TempDir::new().unwrap();
        let storage = FileStorage::new(
            Some(session.path().to_path_buf()),
            persistent.path().to_path_buf(),
        );
        (session, persistent, storage)
    }

    fn user() -> UserKey {
        "alice".parse().unwrap()
    }

    #[test]
    fn missing_blob_loads_as_none() {
        let (_s, _p, storage) = setup();
        assert!(storage.load(&user(), Scope::Persistent).unwrap().is_none());
    }

    #[test]
    fn save_and_load_per_scope() {
        let (session, _p, mut storage) = setup();
        let blob = json!({ "normal": { "el": { "pages|1": "1" } }, "current": "normal" });

        storage.save(&user(), Scope::Session, &blob).unwrap();

        assert_eq!(storage.load(&user(), Scope::Session).unwrap(), Some(blob));
        assert!(storage.load(&user(), Scope::Persistent).unwrap().is_none());
        assert!(session.path().join("clipboard-alice.json").exists());
    }

    #[test]
    fn no_tmp_files_left_behind() {
        let (_s, persistent, mut storage) = setup();
        storage
            .save(&user(), Scope::Persistent, &json!({ "current": "normal" }))
            .unwrap();

        for entry in fs::read_dir(persistent.path()).unwrap() {
            let name = entry.unwrap().file_name();
            assert!(!name.to_string_lossy().ends_with(".tmp"));
        }
    }

    #[test]
    fn session_scope_requires_root() {
        let persistent = TempDir::new().unwrap();
        let storage = FileStorage::new(None, persistent.path().to_path_buf());
        assert!(matches!(
            storage.load(&user(), Scope::Session),
            Err(ClipError::Store(_))
        ));
    }

    #[test]
    fn corrupt_blob_is_an_error() {
        let (_s, persistent, storage) = setup();
        fs::write(persistent.path().join("clipboard-alice.json"), "{ nope").unwrap();
        assert!(matches!(
            storage.load(&user(), Scope::Persistent),
            Err(ClipError::Serialization(_))
        ));
    }
}
