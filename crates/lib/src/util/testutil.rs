//! Test utilities for wbuild-lib.
//!
//! Provides a toolchain that records its calls instead of spawning processes,
//! and a helper to write small executable stand-ins for real tools.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::consts::BYTECODE_BUILD_DIR;
use crate::error::BuildError;
use crate::toolchain::{BuildScope, Phase, Toolchain};

/// Writes an executable `/bin/sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  Generate {
    build_dir: PathBuf,
    source_dir: PathBuf,
    flags: Vec<String>,
  },
  Build {
    build_dir: PathBuf,
    scope: BuildScope,
  },
}

/// A toolchain that records every call.
///
/// Every successful build drops a `<scope>.built` marker in the build
/// directory. Bytecode builds of `<workflow>_<stage>` leave an artifact where the real
/// toolchain would, containing `artifact_contents`.
#[derive(Debug, Default)]
pub struct RecordingToolchain {
  calls: Mutex<Vec<Call>>,
  artifact_contents: String,
  skip_artifacts: bool,
  fail_build_of: Option<String>,
}

impl RecordingToolchain {
  pub fn new() -> Self {
    Self {
      artifact_contents: "\0asm".to_string(),
      ..Default::default()
    }
  }

  /// Skip writing artifacts, to simulate a toolchain with a different naming scheme.
  pub fn without_artifacts(mut self) -> Self {
    self.skip_artifacts = true;
    self
  }

  /// Make the build phase of `scope` fail.
  pub fn failing_build_of(mut self, scope: &str) -> Self {
    self.fail_build_of = Some(scope.to_string());
    self
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  pub fn generate_count(&self) -> usize {
    self
      .calls()
      .iter()
      .filter(|c| matches!(c, Call::Generate { .. }))
      .count()
  }

  pub fn built_scopes(&self) -> Vec<String> {
    self
      .calls()
      .into_iter()
      .filter_map(|c| match c {
        Call::Build { scope, .. } => Some(scope.to_string()),
        _ => None,
      })
      .collect()
  }
}

impl Toolchain for RecordingToolchain {
  async fn generate(&self, build_dir: &Path, source_dir: &Path, flags: &[String]) -> Result<(), BuildError> {
    self.calls.lock().unwrap().push(Call::Generate {
      build_dir: build_dir.to_path_buf(),
      source_dir: source_dir.to_path_buf(),
      flags: flags.to_vec(),
    });
    Ok(())
  }

  async fn build(&self, build_dir: &Path, scope: &BuildScope) -> Result<(), BuildError> {
    self.calls.lock().unwrap().push(Call::Build {
      build_dir: build_dir.to_path_buf(),
      scope: scope.clone(),
    });

    if self.fail_build_of.as_deref() == Some(scope.to_string().as_str()) {
      return Err(BuildError::ToolchainInvocationFailed {
        phase: Phase::Build,
        program: "ninja".to_string(),
        scope: scope.to_string(),
        code: Some(1),
        stderr: "simulated failure".to_string(),
      });
    }

    std::fs::write(build_dir.join(format!("{}.built", scope)), "").unwrap();

    if !self.skip_artifacts
      && build_dir.ends_with(BYTECODE_BUILD_DIR)
      && let BuildScope::Unit(name) = scope
      && let Some((workflow, _)) = name.split_once('_')
    {
      let dir = build_dir.join(workflow);
      std::fs::create_dir_all(&dir).unwrap();
      std::fs::write(dir.join(format!("{}.wasm", name)), &self.artifact_contents).unwrap();
    }
    Ok(())
  }
}
