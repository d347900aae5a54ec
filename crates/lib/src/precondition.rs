//! Startup precondition: build commands only run inside the build container.

use thiserror::Error;

use crate::consts::{CONTAINER_SENTINEL_VALUE, CONTAINER_SENTINEL_VAR};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupError {
  #[error("builds can only run inside the build container ({var} is not set)")]
  SentinelMissing { var: &'static str },

  #[error("builds can only run inside the build container ({var}={value}, expected {expected})")]
  SentinelMismatch {
    var: &'static str,
    value: String,
    expected: &'static str,
  },
}

/// Checks the container sentinel in the current process environment.
pub fn ensure_container() -> Result<(), StartupError> {
  check_sentinel(std::env::var(CONTAINER_SENTINEL_VAR).ok().as_deref())
}

/// Checks a sentinel value taken from any source.
pub fn check_sentinel(value: Option<&str>) -> Result<(), StartupError> {
  match value {
    None => Err(StartupError::SentinelMissing {
      var: CONTAINER_SENTINEL_VAR,
    }),
    Some(v) if v == CONTAINER_SENTINEL_VALUE => Ok(()),
    Some(v) => Err(StartupError::SentinelMismatch {
      var: CONTAINER_SENTINEL_VAR,
      value: v.to_string(),
      expected: CONTAINER_SENTINEL_VALUE,
    }),
  }
}
