//! # Collaborator Ports
//!
//! The clipboard never looks at records or files itself. It asks three
//! collaborators:
//!
//! - [`SchemaRegistry`]: is a schema still known? Unknown schemas are hidden
//!   from selection views but left in storage.
//! - [`RecordResolver`]: does a record still exist? Used by the pruner.
//! - [`PathResolver`]: does a path still exist? `NotFound` prunes silently,
//!   any other failure is an error the caller has to handle.

use crate::error::{ClipError, Result};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

pub trait SchemaRegistry {
    fn is_known_schema(&self, name: &str) -> bool;
}

pub trait RecordResolver {
    fn exists(&self, schema: &str, id: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    Found,
    NotFound,
}

pub trait PathResolver {
    /// Resolves a stored path. Failures other than "does not exist" are `Err`.
    fn resolve(&self, path: &str) -> Result<PathStatus>;
}

/// Registry backed by a fixed list of schema names.
///
/// Also acts as a schema-level [`RecordResolver`]: a record is considered to
/// exist as long as its schema is registered. Front-ends without access to
/// the record store use this.
#[derive(Debug, Clone, Default)]
pub struct SchemaList {
    names: HashSet<String>,
}

impl SchemaList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl SchemaRegistry for SchemaList {
    fn is_known_schema(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl RecordResolver for SchemaList {
    fn exists(&self, schema: &str, _id: &str) -> bool {
        self.names.contains(schema)
    }
}

/// Resolves paths against the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPathResolver;

impl PathResolver for FsPathResolver {
    fn resolve(&self, path: &str) -> Result<PathStatus> {
        match std::fs::symlink_metadata(Path::new(path)) {
            Ok(_) => Ok(PathStatus::Found),
            // a parent replaced by a file means the path is gone too
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                Ok(PathStatus::NotFound)
            }
            Err(e) => Err(ClipError::PathResolution {
                path: path.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// The three collaborators a session needs, bundled for the controller.
pub struct Collaborators {
    pub schemas: Box<dyn SchemaRegistry>,
    pub records: Box<dyn RecordResolver>,
    pub paths: Box<dyn PathResolver>,
}

impl Collaborators {
    pub fn new(
        schemas: impl SchemaRegistry + 'static,
        records: impl RecordResolver + 'static,
        paths: impl PathResolver + 'static,
    ) -> Self {
        Self {
            schemas: Box::new(schemas),
            records: Box::new(records),
            paths: Box::new(paths),
        }
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use std::collections::HashMap;

    /// Record resolver answering from an explicit set of `(schema, id)` pairs.
    #[derive(Debug, Clone, Default)]
    pub struct FakeRecords {
        existing: HashSet<(String, String)>,
    }

    impl FakeRecords {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, schema: &str, id: &str) -> Self {
            self.existing.insert((schema.to_string(), id.to_string()));
            self
        }
    }

    impl RecordResolver for FakeRecords {
        fn exists(&self, schema: &str, id: &str) -> bool {
            self.existing
                .contains(&(schema.to_string(), id.to_string()))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum FakePath {
        Found,
        Denied,
    }

    /// Path resolver with scripted answers. Unlisted paths are `NotFound`.
    #[derive(Debug, Clone, Default)]
    pub struct FakePaths {
        paths: HashMap<String, FakePath>,
    }

    impl FakePaths {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn found(mut self, path: &str) -> Self {
            self.paths.insert(path.to_string(), FakePath::Found);
            self
        }

        pub fn denied(mut self, path: &str) -> Self {
            self.paths.insert(path.to_string(), FakePath::Denied);
            self
        }
    }

    impl PathResolver for FakePaths {
        fn resolve(&self, path: &str) -> Result<PathStatus> {
            match self.paths.get(path) {
                Some(FakePath::Found) => Ok(PathStatus::Found),
                Some(FakePath::Denied) => Err(ClipError::PathResolution {
                    path: path.to_string(),
                    reason: "access denied".to_string(),
                }),
                None => Ok(PathStatus::NotFound),
            }
        }
    }
}
