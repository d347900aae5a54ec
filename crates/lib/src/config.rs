//! Build configuration and its validation.
//!
//! Validation runs once per build run, before any build directory is touched,
//! and only performs read-only filesystem checks.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::BuildError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum OptimizationLevel {
  Debug,
  #[default]
  Release,
}

impl OptimizationLevel {
  /// Value understood by `CMAKE_BUILD_TYPE`.
  pub fn as_cmake(self) -> &'static str {
    match self {
      OptimizationLevel::Debug => "Debug",
      OptimizationLevel::Release => "Release",
    }
  }
}

impl fmt::Display for OptimizationLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_cmake())
  }
}

/// Certificate material threaded into the native build configuration.
///
/// The two forms are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "path")]
pub enum TrustMaterial {
  File(PathBuf),
  Dir(PathBuf),
}

impl TrustMaterial {
  pub fn path(&self) -> &Path {
    match self {
      TrustMaterial::File(p) | TrustMaterial::Dir(p) => p,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
  pub optimization: OptimizationLevel,
  /// Destroy and recreate build directories, forcing regeneration.
  pub clean: bool,
  /// Build with threading support enabled.
  pub threading: bool,
  /// Compile in timing instrumentation (microbenchmarks).
  pub timing: bool,
  pub trust_material: Option<TrustMaterial>,
}

/// Non-fatal findings from validation. The build proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConfigWarning {
  EmptyTrustDirectory(PathBuf),
}

impl fmt::Display for ConfigWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigWarning::EmptyTrustDirectory(p) => write!(f, "trust-material directory is empty: {}", p.display()),
    }
  }
}

/// A configuration whose trust material exists and has been made absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
  config: BuildConfiguration,
  pub warnings: Vec<ConfigWarning>,
}

impl ValidatedConfig {
  pub fn config(&self) -> &BuildConfiguration {
    &self.config
  }

  pub fn trust_material(&self) -> Option<&TrustMaterial> {
    self.config.trust_material.as_ref()
  }
}

/// Validates `config`, rejecting trust material that is missing or of the wrong kind.
pub fn validate(config: &BuildConfiguration) -> Result<ValidatedConfig, BuildError> {
  let mut warnings = Vec::new();

  let trust_material = match &config.trust_material {
    None => None,
    Some(TrustMaterial::File(path)) => {
      check_exists(path)?;
      if !path.is_file() {
        return Err(invalid(path, "is not a file"));
      }
      Some(TrustMaterial::File(absolute(path)?))
    }
    Some(TrustMaterial::Dir(path)) => {
      check_exists(path)?;
      if !path.is_dir() {
        return Err(invalid(path, "is not a directory"));
      }
      let path = absolute(path)?;
      let mut entries = std::fs::read_dir(&path).map_err(|e| invalid(&path, &e.to_string()))?;
      if entries.next().is_none() {
        warn!(path = %path.display(), "trust-material directory is empty");
        warnings.push(ConfigWarning::EmptyTrustDirectory(path.clone()));
      }
      Some(TrustMaterial::Dir(path))
    }
  };

  if let Some(tm) = &trust_material {
    debug!(path = %tm.path().display(), "trust material validated");
  }

  Ok(ValidatedConfig {
    config: BuildConfiguration {
      trust_material,
      ..config.clone()
    },
    warnings,
  })
}

fn check_exists(path: &Path) -> Result<(), BuildError> {
  if path.exists() {
    Ok(())
  } else {
    Err(invalid(path, "does not exist"))
  }
}

fn absolute(path: &Path) -> Result<PathBuf, BuildError> {
  dunce::canonicalize(path).map_err(|e| invalid(path, &e.to_string()))
}

fn invalid(path: &Path, reason: &str) -> BuildError {
  BuildError::InvalidInputPath {
    path: path.to_path_buf(),
    reason: reason.to_string(),
  }
}
