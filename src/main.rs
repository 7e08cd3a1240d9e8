use std::env;

use atm_ledger::{JsonFileStore, LedgerStore};

const USAGE: &str = "usage: atm_ledger <data-file> <command> [args...]

commands:
  login <card> <pin>
  deposit <card> <amount> [note]
  withdraw <card> <amount> [note]
  transfer <source> <target> <amount> [note]
  change-pin <card> <old-pin> <new-pin>
  history <card>
  show <card>";

fn main() {
    // logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let path = args.next().ok_or(USAGE)?;
    let command = args.next().ok_or(USAGE)?;
    let rest: Vec<String> = args.collect();

    let mut ledger = LedgerStore::open(JsonFileStore::new(path))?;

    match (command.as_str(), rest.as_slice()) {
        ("login", [card, pin]) => {
            let account = ledger.authenticate(card, pin)?;
            println!("{} authenticated; balance {}", account.name, account.balance);
        }
        ("deposit", [card, amount]) => {
            let balance = ledger.deposit(card, amount, "")?;
            println!("new balance {}", balance);
        }
        ("deposit", [card, amount, note]) => {
            let balance = ledger.deposit(card, amount, note)?;
            println!("new balance {}", balance);
        }
        ("withdraw", [card, amount]) => {
            let balance = ledger.withdraw(card, amount, "")?;
            println!("new balance {}", balance);
        }
        ("withdraw", [card, amount, note]) => {
            let balance = ledger.withdraw(card, amount, note)?;
            println!("new balance {}", balance);
        }
        ("transfer", [source, target, amount]) => {
            ledger.transfer(source, target, amount, "")?;
            println!("transferred {} from {} to {}", amount, source, target);
        }
        ("transfer", [source, target, amount, note]) => {
            ledger.transfer(source, target, amount, note)?;
            println!("transferred {} from {} to {}", amount, source, target);
        }
        ("change-pin", [card, old_pin, new_pin]) => {
            ledger.change_pin(card, old_pin, new_pin)?;
            println!("PIN changed");
        }
        ("history", [card]) => {
            for transaction in ledger.transactions_of(card)? {
                println!("{}", transaction);
            }
        }
        ("show", [card]) => {
            let account = ledger.get_account(card)?;
            println!(
                "{} balance {} locked {}",
                account.name, account.balance, account.is_locked
            );
        }
        _ => return Err(USAGE.into()),
    }

    Ok(())
}
