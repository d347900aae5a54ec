//! Result types for a build run.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::ConfigWarning;
use crate::target::BuildTarget;

/// What happened to one (unit, target) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
  /// Build scope passed to the toolchain (`<workflow>_<stage>`, a target name, or `all`).
  pub scope: String,
  pub target: BuildTarget,
  pub build_dir: PathBuf,
  /// Whether the generation phase ran for this unit.
  pub regenerated: bool,
  /// Store path of the published artifact (bytecode workflow stages only).
  #[serde(skip_serializing_if = "Option::is_none")]
  pub published: Option<PathBuf>,
}

/// Summary of a successful run, in build order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
  pub units: Vec<UnitReport>,
  pub warnings: Vec<ConfigWarning>,
}

impl BuildReport {
  pub fn generation_count(&self) -> usize {
    self.units.iter().filter(|u| u.regenerated).count()
  }

  pub fn build_count(&self) -> usize {
    self.units.len()
  }

  pub fn published(&self) -> impl Iterator<Item = &PathBuf> {
    self.units.iter().filter_map(|u| u.published.as_ref())
  }
}
