//! One-way PIN hashing.
//!
//! Unsalted single-round SHA-256, matching the stored `pin_hash` format.
//! Fine for a demo ledger; anything beyond that wants a salted, iterated or
//! memory-hard credential hash.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest over the UTF-8 bytes of the PIN.
pub fn pin_digest(pin: &str) -> String {
    hex::encode(Sha256::digest(pin.as_bytes()))
}

/// Accepted PIN shape: 4 to 6 ASCII digits.
pub fn is_valid_pin_format(pin: &str) -> bool {
    (4..=6).contains(&pin.len()) && pin.bytes().all(|b| b.is_ascii_digit())
}
