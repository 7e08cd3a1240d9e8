use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::domain::credential::{is_valid_pin_format, pin_digest};
use crate::domain::{
    Account, LedgerError, MAX_FAILED_ATTEMPTS, Money, Snapshot, SnapshotStore, Transaction,
    TransactionKind,
};

/// The aggregate root: owns the full card-number to account mapping,
/// enforces authentication and balance invariants, and persists the whole
/// snapshot through the injected store before any mutating call returns.
///
/// Single caller, synchronous: operations run to completion or fail, and a
/// failed operation leaves every balance, log and lock untouched.
#[derive(Debug)]
pub struct LedgerStore<S: SnapshotStore> {
    store: S,
    accounts: BTreeMap<String, Account>,
}

impl<S: SnapshotStore> LedgerStore<S> {
    /// Load the snapshot, or seed the two demonstration accounts and write
    /// the first snapshot if none exists yet.
    pub fn open(mut store: S) -> Result<Self, LedgerError> {
        match store.load()? {
            Some(snapshot) => {
                let mut accounts = snapshot.accounts;
                // The map key is authoritative; the record itself does not
                // carry the card number on the wire.
                for (card, account) in accounts.iter_mut() {
                    account.card_number = card.clone();
                }
                debug!(accounts = accounts.len(), "snapshot loaded");
                Ok(Self { store, accounts })
            }
            None => {
                let mut ledger = Self {
                    store,
                    accounts: BTreeMap::new(),
                };
                ledger.seed()?;
                Ok(ledger)
            }
        }
    }

    fn seed(&mut self) -> Result<(), LedgerError> {
        for account in [
            Account::seed("12345678", "Alice", "1234", Money::parse("500.00")?),
            Account::seed("87654321", "Bob", "4321", Money::parse("1000.00")?),
        ] {
            self.accounts
                .insert(account.card_number.clone(), account);
        }
        self.store.save(&self.snapshot())?;
        info!("seeded demonstration accounts");
        Ok(())
    }

    /// Check the card and PIN, maintaining the lockout counter.
    ///
    /// The lock is checked before the digest compare; the failed attempt
    /// that reaches the limit reports `AccountLocked` rather than
    /// `InvalidCredential`. Both outcomes are persisted.
    pub fn authenticate(&mut self, card: &str, pin: &str) -> Result<Account, LedgerError> {
        let backup = vec![self.account(card)?.clone()];
        let account = self.account_mut(card)?;

        if account.is_locked {
            return Err(LedgerError::AccountLocked(card.to_string()));
        }

        if account.verify_pin(pin) {
            account.failed_attempts = 0;
            self.persist(&backup)?;
            return Ok(self.account(card)?.clone());
        }

        account.failed_attempts += 1;
        let now_locked = account.failed_attempts >= MAX_FAILED_ATTEMPTS;
        account.is_locked = now_locked;
        self.persist(&backup)?;

        if now_locked {
            warn!(card = %card, "account locked after repeated PIN failures");
            Err(LedgerError::AccountLocked(card.to_string()))
        } else {
            Err(LedgerError::InvalidCredential)
        }
    }

    /// Add a positive amount to the account balance. Returns the new balance.
    pub fn deposit(&mut self, card: &str, amount: &str, note: &str) -> Result<Money, LedgerError> {
        let amount = parse_positive(amount)?;
        let backup = vec![self.account(card)?.clone()];
        let rounded = amount.rounded();

        let account = self.account_mut(card)?;
        let new_balance = (account.balance + amount).rounded();
        account.balance = new_balance;
        account.record(Transaction::new(TransactionKind::Deposit, rounded, None, note));
        self.persist(&backup)?;

        info!(card = %card, amount = %rounded, balance = %new_balance, "deposit applied");
        Ok(new_balance)
    }

    /// Subtract a positive amount from the account balance, refusing to let
    /// the balance go negative. Returns the new balance.
    pub fn withdraw(&mut self, card: &str, amount: &str, note: &str) -> Result<Money, LedgerError> {
        let amount = parse_positive(amount)?;
        let backup = vec![self.account(card)?.clone()];
        let rounded = amount.rounded();

        let account = self.account_mut(card)?;
        if account.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                balance: account.balance,
                requested: rounded,
            });
        }
        let new_balance = (account.balance - amount).rounded();
        account.balance = new_balance;
        account.record(Transaction::new(TransactionKind::Withdraw, rounded, None, note));
        self.persist(&backup)?;

        info!(card = %card, amount = %rounded, balance = %new_balance, "withdrawal applied");
        Ok(new_balance)
    }

    /// Move a positive amount between two distinct accounts: one debit leg,
    /// one credit leg, one persist covering both.
    pub fn transfer(
        &mut self,
        source: &str,
        target: &str,
        amount: &str,
        note: &str,
    ) -> Result<(), LedgerError> {
        let amount = parse_positive(amount)?;
        if source == target {
            return Err(LedgerError::SameAccount);
        }
        let backup = vec![
            self.account(source)?.clone(),
            self.account(target)?.clone(),
        ];
        let rounded = amount.rounded();

        {
            let src = self.account_mut(source)?;
            if src.balance < amount {
                return Err(LedgerError::InsufficientFunds {
                    balance: src.balance,
                    requested: rounded,
                });
            }
            src.balance = (src.balance - amount).rounded();
            src.record(Transaction::new(
                TransactionKind::TransferOut,
                rounded,
                Some(target.to_string()),
                note,
            ));
        }
        {
            let tgt = self.account_mut(target)?;
            tgt.balance = (tgt.balance + amount).rounded();
            tgt.record(Transaction::new(
                TransactionKind::TransferIn,
                rounded,
                Some(source.to_string()),
                note,
            ));
        }
        self.persist(&backup)?;

        info!(source = %source, target = %target, amount = %rounded, "transfer applied");
        Ok(())
    }

    /// Replace the PIN digest after verifying the old PIN. Clears the lock
    /// and the failure counter; this is the only way out of a lockout.
    pub fn change_pin(
        &mut self,
        card: &str,
        old_pin: &str,
        new_pin: &str,
    ) -> Result<(), LedgerError> {
        let backup = vec![self.account(card)?.clone()];
        let account = self.account_mut(card)?;

        if !account.verify_pin(old_pin) {
            return Err(LedgerError::InvalidCredential);
        }
        if !is_valid_pin_format(new_pin) {
            return Err(LedgerError::InvalidPinFormat);
        }

        account.pin_hash = pin_digest(new_pin);
        account.failed_attempts = 0;
        account.is_locked = false;
        account.record(Transaction::new(
            TransactionKind::PinChange,
            Money::ZERO,
            None,
            "PIN updated",
        ));
        self.persist(&backup)?;

        info!(card = %card, "PIN changed");
        Ok(())
    }

    /// The account's full log, in append order.
    pub fn transactions_of(&self, card: &str) -> Result<&[Transaction], LedgerError> {
        Ok(&self.account(card)?.transactions)
    }

    pub fn get_account(&self, card: &str) -> Result<&Account, LedgerError> {
        self.account(card)
    }

    pub fn balance_of(&self, card: &str) -> Result<Money, LedgerError> {
        Ok(self.account(card)?.balance)
    }

    /// Hand the storage port back, dropping the in-memory state.
    pub fn into_store(self) -> S {
        self.store
    }

    #[cfg(test)]
    fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn account(&self, card: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .get(card)
            .ok_or_else(|| LedgerError::UnknownAccount(card.to_string()))
    }

    fn account_mut(&mut self, card: &str) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(card)
            .ok_or_else(|| LedgerError::UnknownAccount(card.to_string()))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            accounts: self.accounts.clone(),
        }
    }

    /// Write the full snapshot; if the write fails, restore the touched
    /// accounts from `backup` so memory never diverges from disk.
    fn persist(&mut self, backup: &[Account]) -> Result<(), LedgerError> {
        if let Err(err) = self.store.save(&self.snapshot()) {
            for account in backup {
                self.accounts
                    .insert(account.card_number.clone(), account.clone());
            }
            return Err(err.into());
        }
        Ok(())
    }
}

/// Parse amount text and require it to be strictly positive.
fn parse_positive(text: &str) -> Result<Money, LedgerError> {
    let amount = Money::parse(text)?;
    if !amount.is_positive() {
        return Err(LedgerError::InvalidAmount(text.trim().to_string()));
    }
    Ok(amount)
}
