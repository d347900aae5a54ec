//! Error types for build orchestration.

use std::path::PathBuf;

use thiserror::Error;

use crate::toolchain::Phase;

/// Errors that abort a build run.
///
/// None of these are retried; they surface to the caller, which reports the
/// offending path or unit and exits non-zero.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Trust material is missing or of the wrong kind. Reported before any build work.
  #[error("invalid input path {}: {reason}", path.display())]
  InvalidInputPath { path: PathBuf, reason: String },

  #[error("failed to remove build directory {}: {source}", path.display())]
  DirectoryRemovalFailed { path: PathBuf, source: std::io::Error },

  #[error("failed to create build directory {}: {source}", path.display())]
  DirectoryCreationFailed { path: PathBuf, source: std::io::Error },

  /// The toolchain process could not be started at all.
  #[error("failed to spawn {program} for {phase} in {}: {source}", cwd.display())]
  ToolchainSpawnFailed {
    phase: Phase,
    program: String,
    cwd: PathBuf,
    source: std::io::Error,
  },

  /// The toolchain ran and exited non-zero.
  #[error("{phase} failed for {scope} ({program} exited with {}){}", format_code(*code), format_stderr(stderr))]
  ToolchainInvocationFailed {
    phase: Phase,
    program: String,
    scope: String,
    code: Option<i32>,
    stderr: String,
  },

  /// A reported-successful build left no artifact where the naming convention expects one.
  #[error("artifact not found for {workflow}/{stage}: expected {}", path.display())]
  ArtifactNotFound {
    workflow: String,
    stage: String,
    path: PathBuf,
  },

  #[error("failed to publish {} to {}: {source}", from.display(), to.display())]
  PublishFailed {
    from: PathBuf,
    to: PathBuf,
    source: std::io::Error,
  },

  #[error("failed to write generation stamp {}: {source}", path.display())]
  StampWriteFailed { path: PathBuf, source: std::io::Error },
}

fn format_code(code: Option<i32>) -> String {
  match code {
    Some(code) => format!("code {}", code),
    None => "no exit code".to_string(),
  }
}

fn format_stderr(stderr: &str) -> String {
  let trimmed = stderr.trim();
  if trimmed.is_empty() {
    String::new()
  } else {
    format!(":\n{}", trimmed)
  }
}
