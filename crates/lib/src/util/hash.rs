//! Fingerprints for the generation phase.
//!
//! A fingerprint is the full SHA-256 of an ordered argument list. Each
//! argument is length-prefixed so `["ab", "c"]` and `["a", "bc"]` differ.

use std::fmt;

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub String);

impl fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub fn fingerprint_args<S: AsRef<str>>(args: &[S]) -> Fingerprint {
  let mut hasher = Sha256::new();
  for arg in args {
    let arg = arg.as_ref();
    hasher.update((arg.len() as u64).to_le_bytes());
    hasher.update(arg.as_bytes());
  }
  Fingerprint(hex::encode(hasher.finalize()))
}
