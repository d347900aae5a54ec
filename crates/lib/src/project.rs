//! Buildable project trees under a repository root.
//!
//! Workflows fan out over the catalog. Applications and microbenchmarks are
//! standalone trees: applications build unscoped in one shot, microbenchmarks
//! build one named target each from their own source directory.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{APPLICATIONS_DIR, UBENCH_DIR, WORKFLOWS_DIR};
use crate::target::BuildTarget;
use crate::toolchain::BuildScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Project {
  Workflows,
  Applications,
  Ubench,
}

impl Project {
  pub const ALL: [Project; 3] = [Project::Workflows, Project::Applications, Project::Ubench];

  pub fn dir_name(self) -> &'static str {
    match self {
      Project::Workflows => WORKFLOWS_DIR,
      Project::Applications => APPLICATIONS_DIR,
      Project::Ubench => UBENCH_DIR,
    }
  }

  pub fn root(self, repo_root: &Path) -> PathBuf {
    repo_root.join(self.dir_name())
  }

  /// Targets built when the caller does not ask for specific ones.
  pub fn default_targets(self) -> &'static [BuildTarget] {
    match self {
      Project::Workflows => &[BuildTarget::Bytecode],
      Project::Applications => &[BuildTarget::Native],
      Project::Ubench => &BuildTarget::ALL,
    }
  }
}

impl fmt::Display for Project {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.dir_name())
  }
}

/// One build of a standalone project: generate from `source_dir`, then build `scope`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandaloneUnit {
  pub source_dir: PathBuf,
  pub scope: BuildScope,
}

/// A microbenchmark: its source directory name and its build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Microbenchmark {
  pub name: &'static str,
  pub target: &'static str,
}

pub const MICROBENCHMARKS: &[Microbenchmark] = &[Microbenchmark {
  name: "cold-start",
  target: "ubench-cold-start",
}];

/// The applications tree, built as a whole.
pub fn application_units(apps_root: &Path) -> Vec<StandaloneUnit> {
  vec![StandaloneUnit {
    source_dir: apps_root.to_path_buf(),
    scope: BuildScope::All,
  }]
}

/// One unit per microbenchmark, each generated from `<ubench_root>/<name>`.
pub fn microbenchmark_units(ubench_root: &Path) -> Vec<StandaloneUnit> {
  MICROBENCHMARKS
    .iter()
    .map(|ub| StandaloneUnit {
      source_dir: ubench_root.join(ub.name),
      scope: BuildScope::unit(ub.target),
    })
    .collect()
}
