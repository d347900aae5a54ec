//! Shared utilities.
//!
//! Fingerprinting of generation flags and test helpers.

pub mod hash;

#[cfg(test)]
pub mod testutil;
