use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::account::Account;
use crate::domain::error::PersistenceError;

/// The full persisted representation of all accounts, rewritten wholesale
/// on each mutation. A `BTreeMap` keeps the document deterministically
/// ordered across rewrites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub accounts: BTreeMap<String, Account>,
}

/// Storage port for the ledger: read the whole snapshot, write the whole
/// snapshot. Injected into the ledger so tests can substitute an in-memory
/// fake without touching a filesystem.
pub trait SnapshotStore {
    /// `Ok(None)` means no snapshot exists yet and the ledger should seed.
    fn load(&mut self) -> Result<Option<Snapshot>, PersistenceError>;

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}
