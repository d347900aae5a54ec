//! Publishes bytecode artifacts into the runtime function store.
//!
//! The store is owned by the runtime; it addresses functions as
//! `<store>/<workflow>/<stage>/function.wasm`. Publishing copies (never moves)
//! the artifact and overwrites whatever was there: the last build wins.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::CompilationUnit;
use crate::consts::PUBLISHED_ARTIFACT_NAME;
use crate::error::BuildError;
use crate::paths;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publisher {
  store_root: PathBuf,
}

impl Publisher {
  pub fn new(store_root: impl Into<PathBuf>) -> Self {
    Self {
      store_root: store_root.into(),
    }
  }

  /// Publisher for the store named by `WBUILD_FUNCTION_STORE`.
  pub fn from_env() -> Self {
    Self::new(paths::function_store_dir())
  }

  pub fn store_root(&self) -> &Path {
    &self.store_root
  }

  /// Where the toolchain leaves a unit's artifact: `<build_dir>/<workflow>/<workflow>_<stage>.wasm`.
  pub fn built_artifact_path(build_dir: &Path, unit: &CompilationUnit) -> PathBuf {
    build_dir.join(&unit.workflow).join(unit.bytecode_artifact_name())
  }

  /// Store location for (workflow, stage).
  pub fn artifact_path(&self, workflow: &str, stage: &str) -> PathBuf {
    self.store_root.join(workflow).join(stage).join(PUBLISHED_ARTIFACT_NAME)
  }

  pub fn is_published(&self, workflow: &str, stage: &str) -> bool {
    self.artifact_path(workflow, stage).is_file()
  }

  /// Copies the built artifact of (workflow, stage) into the store and returns its new path.
  pub fn publish(&self, build_dir: &Path, workflow: &str, stage: &str) -> Result<PathBuf, BuildError> {
    let unit = CompilationUnit::new(workflow, stage);
    let from = Self::built_artifact_path(build_dir, &unit);
    if !from.is_file() {
      return Err(BuildError::ArtifactNotFound {
        workflow: workflow.to_string(),
        stage: stage.to_string(),
        path: from,
      });
    }

    let to = self.artifact_path(workflow, stage);
    let publish_err = |source| BuildError::PublishFailed {
      from: from.clone(),
      to: to.clone(),
      source,
    };

    if let Some(parent) = to.parent() {
      std::fs::create_dir_all(parent).map_err(publish_err)?;
    }
    let bytes = std::fs::copy(&from, &to).map_err(publish_err)?;

    info!(unit = %unit, bytes, dest = %to.display(), "published artifact");
    Ok(to)
  }
}
