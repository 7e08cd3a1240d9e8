use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::domain::{PersistenceError, Snapshot, SnapshotStore};

/// Snapshot store backed by a single JSON document on disk.
///
/// Saves write the whole document to a sibling `.tmp` file and rename it
/// over the target, so a crash mid-write leaves the previous snapshot
/// intact rather than a truncated file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<Snapshot>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}

/// In-memory snapshot store for tests and demos. `fail_writes` makes every
/// subsequent save fail, to exercise the ledger's rollback path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<Snapshot>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&mut self) -> Result<Option<Snapshot>, PersistenceError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Io(io::Error::other(
                "injected write failure",
            )));
        }
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }
}
