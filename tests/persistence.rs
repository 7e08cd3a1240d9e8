//! Persist-then-reload round trips against the real file store.

use atm_ledger::{JsonFileStore, LedgerStore, Money, TransactionKind};
use rust_decimal_macros::dec;

const ALICE: &str = "12345678";
const BOB: &str = "87654321";

#[test]
fn reload_yields_identical_accounts_balances_and_logs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");

    let (alice, bob) = {
        let mut ledger = LedgerStore::open(JsonFileStore::new(&path)).unwrap();
        ledger.deposit(ALICE, "100.00", "salary").unwrap();
        ledger.withdraw(ALICE, "25.50", "coffee").unwrap();
        ledger.transfer(ALICE, BOB, "50.00", "rent").unwrap();
        ledger.change_pin(BOB, "4321", "555555").unwrap();
        (
            ledger.get_account(ALICE).unwrap().clone(),
            ledger.get_account(BOB).unwrap().clone(),
        )
    };

    let reloaded = LedgerStore::open(JsonFileStore::new(&path)).unwrap();
    assert_eq!(reloaded.get_account(ALICE).unwrap(), &alice);
    assert_eq!(reloaded.get_account(BOB).unwrap(), &bob);

    assert_eq!(
        reloaded.balance_of(ALICE).unwrap(),
        Money::from(dec!(524.50))
    );
    assert_eq!(
        reloaded.balance_of(BOB).unwrap(),
        Money::from(dec!(1050.00))
    );

    let bob_log = reloaded.transactions_of(BOB).unwrap();
    let kinds: Vec<TransactionKind> = bob_log.iter().map(|tx| tx.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::Deposit,
            TransactionKind::TransferIn,
            TransactionKind::PinChange,
        ],
        "append order preserved across reload"
    );
}

#[test]
fn lock_state_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");

    {
        let mut ledger = LedgerStore::open(JsonFileStore::new(&path)).unwrap();
        for _ in 0..3 {
            let _ = ledger.authenticate(ALICE, "0000");
        }
        assert!(ledger.get_account(ALICE).unwrap().is_locked);
    }

    let mut reloaded = LedgerStore::open(JsonFileStore::new(&path)).unwrap();
    let alice = reloaded.get_account(ALICE).unwrap();
    assert!(alice.is_locked);
    assert_eq!(alice.failed_attempts, 3);
    assert!(matches!(
        reloaded.authenticate(ALICE, "1234"),
        Err(atm_ledger::LedgerError::AccountLocked(_))
    ));
}

#[test]
fn new_pin_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.json");

    {
        let mut ledger = LedgerStore::open(JsonFileStore::new(&path)).unwrap();
        ledger.change_pin(ALICE, "1234", "9999").unwrap();
    }

    let mut reloaded = LedgerStore::open(JsonFileStore::new(&path)).unwrap();
    assert!(reloaded.authenticate(ALICE, "9999").is_ok());
    assert!(matches!(
        reloaded.authenticate(ALICE, "1234"),
        Err(atm_ledger::LedgerError::InvalidCredential)
    ));
}
