//! Build directory lifecycle.
//!
//! A build directory is created when absent, reused across runs, and destroyed
//! and recreated on a clean request. The directory is the only state that
//! outlives a run, together with the generation stamp written inside it after
//! a successful generation phase.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::consts::GENERATION_STAMP;
use crate::error::BuildError;
use crate::util::hash::Fingerprint;

const STAMP_VERSION: u32 = 1;

/// Outcome of [`prepare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparedState {
  /// The generation phase must run: the directory was just created or a clean was requested.
  pub must_regenerate: bool,
  /// The directory did not exist (or was removed) and has been created.
  pub created: bool,
}

/// Makes `build_dir` ready for a build.
///
/// With `clean`, an existing directory is removed recursively first. A missing
/// directory is then created. Removal and creation failures are fatal.
pub fn prepare(build_dir: &Path, clean: bool) -> Result<PreparedState, BuildError> {
  if clean && build_dir.exists() {
    info!(path = %build_dir.display(), "removing build directory");
    std::fs::remove_dir_all(build_dir).map_err(|source| BuildError::DirectoryRemovalFailed {
      path: build_dir.to_path_buf(),
      source,
    })?;
  }

  let created = if build_dir.exists() {
    false
  } else {
    debug!(path = %build_dir.display(), "creating build directory");
    std::fs::create_dir_all(build_dir).map_err(|source| BuildError::DirectoryCreationFailed {
      path: build_dir.to_path_buf(),
      source,
    })?;
    true
  };

  Ok(PreparedState {
    must_regenerate: created || clean,
    created,
  })
}

/// Contents of the generation stamp file.
#[derive(Debug, Serialize, Deserialize)]
struct GenerationStamp {
  version: u32,
  fingerprint: String,
}

fn stamp_path(build_dir: &Path) -> PathBuf {
  build_dir.join(GENERATION_STAMP)
}

/// Fingerprint recorded by the last successful generation, if any.
///
/// Unreadable or malformed stamps count as absent.
pub fn read_stamp(build_dir: &Path) -> Option<Fingerprint> {
  let path = stamp_path(build_dir);
  let content = std::fs::read_to_string(&path).ok()?;
  match serde_json::from_str::<GenerationStamp>(&content) {
    Ok(stamp) if stamp.version == STAMP_VERSION => Some(Fingerprint(stamp.fingerprint)),
    Ok(stamp) => {
      debug!(path = %path.display(), version = stamp.version, "ignoring stamp with unknown version");
      None
    }
    Err(e) => {
      debug!(path = %path.display(), error = %e, "ignoring malformed stamp");
      None
    }
  }
}

/// Whether the directory was last generated with exactly `fingerprint`.
pub fn stamp_matches(build_dir: &Path, fingerprint: &Fingerprint) -> bool {
  read_stamp(build_dir).is_some_and(|fp| fp == *fingerprint)
}

pub fn write_stamp(build_dir: &Path, fingerprint: &Fingerprint) -> Result<(), BuildError> {
  let path = stamp_path(build_dir);
  let stamp = GenerationStamp {
    version: STAMP_VERSION,
    fingerprint: fingerprint.0.clone(),
  };
  let content = serde_json::to_string(&stamp).map_err(|e| BuildError::StampWriteFailed {
    path: path.clone(),
    source: io::Error::other(e),
  })?;
  std::fs::write(&path, format!("{}\n", content)).map_err(|source| BuildError::StampWriteFailed { path, source })
}

/// Removes the stamp so an interrupted generation is never mistaken for a complete one.
pub fn clear_stamp(build_dir: &Path) -> Result<(), BuildError> {
  let path = stamp_path(build_dir);
  match std::fs::remove_file(&path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(source) => Err(BuildError::StampWriteFailed { path, source }),
  }
}

/// Total size in bytes of the regular files under `path`.
pub fn dir_size(path: &Path) -> u64 {
  WalkDir::new(path)
    .into_iter()
    .filter_map(|e| e.ok())
    .filter(|e| e.file_type().is_file())
    .filter_map(|e| e.metadata().ok())
    .map(|m| m.len())
    .sum()
}

/// Removes a build directory outright. Returns the bytes freed, or `None` if it did not exist.
pub fn remove_build_dir(build_dir: &Path) -> Result<Option<u64>, BuildError> {
  if !build_dir.exists() {
    return Ok(None);
  }
  let size = dir_size(build_dir);
  std::fs::remove_dir_all(build_dir).map_err(|source| BuildError::DirectoryRemovalFailed {
    path: build_dir.to_path_buf(),
    source,
  })?;
  info!(path = %build_dir.display(), bytes = size, "removed build directory");
  Ok(Some(size))
}
