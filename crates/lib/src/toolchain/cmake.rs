//! CMake + Ninja toolchain.
//!
//! Each phase spawns one child process with the build directory as its
//! working directory. Both output streams are forwarded to the log line by
//! line as they arrive (stdout at `info`, stderr at `warn`); stderr is also
//! kept for the error when the child exits non-zero. Failures are not retried.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::BuildError;
use crate::paths;
use crate::toolchain::{BuildScope, Phase, Toolchain};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmakeToolchain {
  cmake: String,
  ninja: String,
}

impl CmakeToolchain {
  pub fn new(cmake: impl Into<String>, ninja: impl Into<String>) -> Self {
    Self {
      cmake: cmake.into(),
      ninja: ninja.into(),
    }
  }

  /// Uses `WBUILD_CMAKE` / `WBUILD_NINJA` when set, else `cmake` / `ninja` from PATH.
  pub fn from_env() -> Self {
    Self::new(paths::cmake_program(), paths::ninja_program())
  }

  async fn run(&self, phase: Phase, program: &str, args: &[String], cwd: &Path, scope: String) -> Result<(), BuildError> {
    info!(%phase, program, scope = %scope, cwd = %cwd.display(), "running toolchain");
    debug!(?args, "toolchain arguments");

    let spawn_err = |source: std::io::Error| BuildError::ToolchainSpawnFailed {
      phase,
      program: program.to_string(),
      cwd: cwd.to_path_buf(),
      source,
    };

    let mut child = Command::new(program)
      .args(args)
      .current_dir(cwd)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(&spawn_err)?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let forward_stdout = async {
      if let Some(stdout) = stdout {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
          info!(%phase, "{}", line);
        }
      }
    };

    // stderr is shown as it arrives and kept for the error report
    let forward_stderr = async {
      let mut captured = String::new();
      if let Some(stderr) = stderr {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
          warn!(%phase, "{}", line);
          captured.push_str(&line);
          captured.push('\n');
        }
      }
      captured
    };

    let ((), stderr) = tokio::join!(forward_stdout, forward_stderr);
    let status = child.wait().await.map_err(spawn_err)?;

    if !status.success() {
      return Err(BuildError::ToolchainInvocationFailed {
        phase,
        program: program.to_string(),
        scope,
        code: status.code(),
        stderr,
      });
    }

    Ok(())
  }
}

impl Toolchain for CmakeToolchain {
  async fn generate(&self, build_dir: &Path, source_dir: &Path, flags: &[String]) -> Result<(), BuildError> {
    let mut args = flags.to_vec();
    args.push(source_dir.display().to_string());
    self
      .run(
        Phase::Generate,
        &self.cmake,
        &args,
        build_dir,
        source_dir.display().to_string(),
      )
      .await
  }

  async fn build(&self, build_dir: &Path, scope: &BuildScope) -> Result<(), BuildError> {
    let args: Vec<String> = scope.as_arg().map(str::to_string).into_iter().collect();
    self
      .run(Phase::Build, &self.ninja, &args, build_dir, scope.to_string())
      .await
  }
}
