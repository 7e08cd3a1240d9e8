pub mod account;
pub mod credential;
pub mod error;
pub mod money;
pub mod traits;
pub mod transaction;

pub use account::{Account, MAX_FAILED_ATTEMPTS};
pub use error::{LedgerError, PersistenceError};
pub use money::Money;
pub use traits::{Snapshot, SnapshotStore};
pub use transaction::{Transaction, TransactionKind};
