use std::fmt;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::money::Money;

/// The kind of ledger event a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    TransferOut,
    TransferIn,
    PinChange,
}

impl TransactionKind {
    /// Sign of this kind's effect on the account balance.
    pub fn sign(&self) -> i64 {
        match self {
            TransactionKind::Deposit | TransactionKind::TransferIn => 1,
            TransactionKind::Withdraw | TransactionKind::TransferOut => -1,
            TransactionKind::PinChange => 0,
        }
    }
}

/// One immutable ledger log entry. Append order is chronological order;
/// entries are never reordered or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Money,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub counterparty: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Transaction {
    /// Build an entry stamped with the current UTC time at second precision.
    pub fn new(
        kind: TransactionKind,
        amount: Money,
        counterparty: Option<String>,
        note: &str,
    ) -> Self {
        Self {
            kind,
            amount,
            timestamp: now_second_precision(),
            counterparty,
            note: (!note.is_empty()).then(|| note.to_string()),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} {}",
            self.timestamp.format(timestamp::FORMAT),
            self.kind,
            self.amount
        )?;
        if let Some(counterparty) = &self.counterparty {
            write!(f, " counterparty={}", counterparty)?;
        }
        if let Some(note) = &self.note {
            write!(f, " note={}", note)?;
        }
        Ok(())
    }
}

/// Current UTC time truncated to whole seconds, so in-memory entries match
/// what the persisted wire format can represent.
fn now_second_precision() -> DateTime<Utc> {
    let now = Utc::now();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Wire format for timestamps: ISO-8601 at second precision, trailing "Z".
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn serializes_to_snapshot_wire_shape() {
        let tx = Transaction {
            kind: TransactionKind::TransferOut,
            amount: Money::from(dec!(50)),
            timestamp: "2024-01-02T03:04:05Z".parse().unwrap(),
            counterparty: Some("87654321".to_string()),
            note: Some("rent".to_string()),
        };

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "transfer_out",
                "amount": "50.00",
                "timestamp": "2024-01-02T03:04:05Z",
                "counterparty": "87654321",
                "note": "rent",
            })
        );

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn kind_strings_match_the_log_vocabulary() {
        for (kind, expected) in [
            (TransactionKind::Deposit, "\"deposit\""),
            (TransactionKind::Withdraw, "\"withdraw\""),
            (TransactionKind::TransferOut, "\"transfer_out\""),
            (TransactionKind::TransferIn, "\"transfer_in\""),
            (TransactionKind::PinChange, "\"pin_change\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
        }
    }

    #[test]
    fn new_entries_have_second_precision_timestamps() {
        let tx = Transaction::new(TransactionKind::Deposit, Money::from(dec!(1)), None, "");
        assert_eq!(tx.timestamp.timestamp_subsec_nanos(), 0);
        assert_eq!(tx.note, None);
    }

    #[test]
    fn empty_note_is_stored_as_absent() {
        let tx = Transaction::new(TransactionKind::Deposit, Money::from(dec!(1)), None, "hi");
        assert_eq!(tx.note.as_deref(), Some("hi"));
        let tx = Transaction::new(TransactionKind::Deposit, Money::from(dec!(1)), None, "");
        assert_eq!(tx.note, None);
    }
}
