use crate::domain::money::Money;

/// Every failure a ledger operation can report. Callers match on the
/// variant; no condition is signalled any other way.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// No account exists under the given card number.
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    /// The account is locked after repeated failed PIN attempts. Only a
    /// successful PIN change clears the lock.
    #[error("account {0} is locked")]
    AccountLocked(String),

    /// PIN digest did not match the stored digest.
    #[error("invalid PIN")]
    InvalidCredential,

    /// Amount text did not parse, or the parsed amount was not positive.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// The account balance does not cover the requested amount.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Money, requested: Money },

    /// Transfer source and target are the same account.
    #[error("cannot transfer to the same account")]
    SameAccount,

    /// A new PIN must be 4 to 6 ASCII digits.
    #[error("PIN must be 4 to 6 digits")]
    InvalidPinFormat,

    /// Writing the snapshot failed; the operation was rolled back.
    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Storage-layer failures, kept separate so the snapshot store stays
/// ignorant of ledger semantics.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}
