//! Single-branch banking ledger over a JSON snapshot file.
//!
//! The [`LedgerStore`] owns all accounts, enforces authentication and
//! balance invariants, and rewrites the whole snapshot through an injected
//! [`SnapshotStore`] before any mutating call returns. The presentation
//! layer (here, a small CLI binary) only calls these operations and renders
//! what they return or fail with.

pub mod domain;
pub mod ledger;
pub mod storage;

pub use domain::{
    Account, LedgerError, Money, PersistenceError, Snapshot, SnapshotStore, Transaction,
    TransactionKind,
};
pub use ledger::LedgerStore;
pub use storage::{JsonFileStore, MemoryStore};
