//! Build targets and their build directories.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{BYTECODE_BUILD_DIR, NATIVE_BUILD_DIR};

/// A compilation target. Each target owns exactly one build directory per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
  /// Portable wasm bytecode consumed by the runtime sandbox.
  Bytecode,
  /// Platform-compiled binaries that execute in place.
  Native,
}

impl BuildTarget {
  pub const ALL: [BuildTarget; 2] = [BuildTarget::Bytecode, BuildTarget::Native];

  pub fn as_str(self) -> &'static str {
    match self {
      BuildTarget::Bytecode => "bytecode",
      BuildTarget::Native => "native",
    }
  }

  /// Name of this target's build directory under a project root.
  pub fn build_dir_name(self) -> &'static str {
    match self {
      BuildTarget::Bytecode => BYTECODE_BUILD_DIR,
      BuildTarget::Native => NATIVE_BUILD_DIR,
    }
  }

  /// Whether the target's artifacts are copied into the function store after a build.
  pub fn publishes(self) -> bool {
    matches!(self, BuildTarget::Bytecode)
  }
}

impl fmt::Display for BuildTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Build directory for `target` under `project_root`.
///
/// Pure path arithmetic: the root is not checked here.
pub fn resolve(project_root: &Path, target: BuildTarget) -> PathBuf {
  project_root.join(target.build_dir_name())
}

/// Orders and deduplicates a requested target set (bytecode first).
pub fn normalize_targets(targets: &[BuildTarget]) -> Vec<BuildTarget> {
  let mut out = targets.to_vec();
  out.sort();
  out.dedup();
  out
}
