//! Shared test helpers for CLI integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Records `generate <cwd> <args>` to the toolchain log.
const FAKE_CMAKE: &str = r#"echo "generate $(pwd) $*" >> "$WBUILD_TEST_LOG""#;

/// Records `build <scope>` and leaves a bytecode artifact where the real build would.
pub const FAKE_NINJA: &str = r#"echo "build ${1:-all}" >> "$WBUILD_TEST_LOG"
case "$1" in
  *_*)
    wf="${1%%_*}"
    mkdir -p "$wf"
    echo "wasm $1" > "$wf/$1.wasm"
    ;;
esac"#;

/// Isolated test environment.
///
/// Each test gets its own repository root, function store and toolchain log.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let env = Self { temp };
    env.write_tool("cmake", FAKE_CMAKE);
    env.write_tool("ninja", FAKE_NINJA);
    env
  }

  /// Replaces one of the fake tools.
  pub fn write_tool(&self, name: &str, body: &str) {
    let dir = self.temp.path().join("bin");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  /// Repository root (`--root`).
  pub fn root_path(&self) -> PathBuf {
    let p = self.temp.path().join("repo");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn store_path(&self) -> PathBuf {
    self.temp.path().join("store")
  }

  pub fn log_path(&self) -> PathBuf {
    self.temp.path().join("toolchain.log")
  }

  /// Lines written by the fake tools, in order.
  pub fn log(&self) -> Vec<String> {
    std::fs::read_to_string(self.log_path())
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  pub fn generate_count(&self) -> usize {
    self.log().iter().filter(|l| l.starts_with("generate ")).count()
  }

  pub fn builds(&self) -> Vec<String> {
    self
      .log()
      .iter()
      .filter_map(|l| l.strip_prefix("build "))
      .map(str::to_string)
      .collect()
  }

  pub fn published(&self, workflow: &str, stage: &str) -> PathBuf {
    self.store_path().join(workflow).join(stage).join("function.wasm")
  }

  pub fn build_dir(&self, project: &str, dir: &str) -> PathBuf {
    self.root_path().join(project).join(dir)
  }

  /// Get a pre-configured Command for the wbuild binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `WBUILD_IN_CONTAINER`: the container sentinel
  /// - `WBUILD_ROOT`: isolated repository root
  /// - `WBUILD_FUNCTION_STORE`: isolated function store
  /// - `WBUILD_CMAKE` / `WBUILD_NINJA`: the fake tools
  /// - `WBUILD_TEST_LOG`: where the fake tools record their calls
  pub fn wbuild_cmd(&self) -> Command {
    let bin = self.temp.path().join("bin");
    let mut cmd: Command = cargo_bin_cmd!("wbuild");
    cmd.env_remove("RUST_LOG");
    cmd.env("WBUILD_IN_CONTAINER", "on");
    cmd.env("WBUILD_ROOT", self.root_path());
    cmd.env("WBUILD_FUNCTION_STORE", self.store_path());
    cmd.env("WBUILD_CMAKE", bin.join("cmake"));
    cmd.env("WBUILD_NINJA", bin.join("ninja"));
    cmd.env("WBUILD_TEST_LOG", self.log_path());
    cmd
  }
}
