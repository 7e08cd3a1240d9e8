use serde::{Deserialize, Serialize};

use crate::domain::credential::pin_digest;
use crate::domain::money::Money;
use crate::domain::transaction::{Transaction, TransactionKind};

/// Consecutive failed PIN comparisons before an account locks.
pub const MAX_FAILED_ATTEMPTS: u32 = 3;

/// One account holder's state: identity, credential digest, balance,
/// transaction log and lockout counters.
///
/// The snapshot stores accounts keyed by card number, so `card_number` is
/// not serialized in the record itself; the store restores it from the map
/// key on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(skip)]
    pub card_number: String,
    pub name: String,
    pub pin_hash: String,
    pub balance: Money,
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub failed_attempts: u32,
    #[serde(default)]
    pub is_locked: bool,
}

impl Account {
    /// A first-run demonstration account with an opening deposit entry.
    pub fn seed(card_number: &str, name: &str, pin: &str, opening_balance: Money) -> Self {
        let opening_balance = opening_balance.rounded();
        Self {
            card_number: card_number.to_string(),
            name: name.to_string(),
            pin_hash: pin_digest(pin),
            balance: opening_balance,
            transactions: vec![Transaction::new(
                TransactionKind::Deposit,
                opening_balance,
                None,
                "Seed",
            )],
            failed_attempts: 0,
            is_locked: false,
        }
    }

    pub fn verify_pin(&self, pin: &str) -> bool {
        self.pin_hash == pin_digest(pin)
    }

    pub fn record(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }
}
