//! The external two-phase toolchain: project generation, then build.
//!
//! [`generation_flags`] turns a validated configuration into the ordered flag
//! list the generation phase accepts. [`Toolchain`] is the seam the driver
//! talks to; [`CmakeToolchain`] runs the real `cmake` and `ninja` binaries.

pub mod cmake;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{TrustMaterial, ValidatedConfig};
use crate::error::BuildError;
use crate::paths;
use crate::target::BuildTarget;

pub use cmake::CmakeToolchain;

pub const GENERATOR_FLAG: &str = "-GNinja";
pub const BUILD_TYPE_FLAG: &str = "-DCMAKE_BUILD_TYPE";
pub const C_COMPILER_FLAG: &str = "-DCMAKE_C_COMPILER";
pub const CXX_COMPILER_FLAG: &str = "-DCMAKE_CXX_COMPILER";
pub const TOOLCHAIN_FILE_FLAG: &str = "-DCMAKE_TOOLCHAIN_FILE";
pub const CERT_PATH_FLAG: &str = "-DAS_CERT_PATH";
pub const CERT_DIR_FLAG: &str = "-DAS_CERT_DIR";
pub const THREADS_FLAG: &str = "-DWASM_THREADS=ON";
pub const TIMING_FLAG: &str = "-DWBUILD_UBENCH=ON";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
  Generate,
  Build,
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Phase::Generate => f.write_str("generate"),
      Phase::Build => f.write_str("build"),
    }
  }
}

/// What the build phase compiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildScope {
  /// A single named target, e.g. one workflow stage.
  Unit(String),
  /// The whole project tree.
  All,
}

impl BuildScope {
  pub fn unit(name: impl Into<String>) -> Self {
    BuildScope::Unit(name.into())
  }

  /// Argument passed to the build program; none for an unscoped build.
  pub fn as_arg(&self) -> Option<&str> {
    match self {
      BuildScope::Unit(name) => Some(name),
      BuildScope::All => None,
    }
  }
}

impl fmt::Display for BuildScope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildScope::Unit(name) => f.write_str(name),
      BuildScope::All => f.write_str("all"),
    }
  }
}

/// Fixed compiler identities for one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainProfile {
  pub c_compiler: String,
  pub cxx_compiler: String,
  /// CMake toolchain file, used for cross-compiling to bytecode.
  pub toolchain_file: Option<PathBuf>,
}

impl ToolchainProfile {
  /// Profile for `target`, honoring environment overrides.
  pub fn for_target(target: BuildTarget) -> Self {
    match target {
      BuildTarget::Bytecode => {
        let (c_compiler, cxx_compiler) = paths::wasm_compilers();
        Self {
          c_compiler,
          cxx_compiler,
          toolchain_file: Some(paths::wasm_toolchain_file()),
        }
      }
      BuildTarget::Native => {
        let (c_compiler, cxx_compiler) = paths::native_compilers();
        Self {
          c_compiler,
          cxx_compiler,
          toolchain_file: None,
        }
      }
    }
  }
}

/// Profiles for both targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profiles {
  pub bytecode: ToolchainProfile,
  pub native: ToolchainProfile,
}

impl Profiles {
  pub fn from_env() -> Self {
    Self {
      bytecode: ToolchainProfile::for_target(BuildTarget::Bytecode),
      native: ToolchainProfile::for_target(BuildTarget::Native),
    }
  }

  pub fn get(&self, target: BuildTarget) -> &ToolchainProfile {
    match target {
      BuildTarget::Bytecode => &self.bytecode,
      BuildTarget::Native => &self.native,
    }
  }
}

/// Ordered generation flags for `target`. The source directory is appended by the invoker.
///
/// Trust material only reaches native builds. Flags without a value are omitted.
pub fn generation_flags(target: BuildTarget, profile: &ToolchainProfile, validated: &ValidatedConfig) -> Vec<String> {
  let config = validated.config();

  let mut flags = vec![
    GENERATOR_FLAG.to_string(),
    format!("{}={}", BUILD_TYPE_FLAG, config.optimization.as_cmake()),
    format!("{}={}", C_COMPILER_FLAG, profile.c_compiler),
    format!("{}={}", CXX_COMPILER_FLAG, profile.cxx_compiler),
  ];

  if let Some(file) = &profile.toolchain_file {
    flags.push(format!("{}={}", TOOLCHAIN_FILE_FLAG, file.display()));
  }

  if target == BuildTarget::Native {
    match validated.trust_material() {
      Some(TrustMaterial::File(path)) => flags.push(format!("{}={}", CERT_PATH_FLAG, path.display())),
      Some(TrustMaterial::Dir(path)) => flags.push(format!("{}={}", CERT_DIR_FLAG, path.display())),
      None => {}
    }
  }

  if config.threading {
    flags.push(THREADS_FLAG.to_string());
  }
  if config.timing {
    flags.push(TIMING_FLAG.to_string());
  }

  flags
}

/// The two toolchain phases. Both block the caller until the child exits.
#[allow(async_fn_in_trait)]
pub trait Toolchain {
  /// Generates project files for `source_dir` into `build_dir`.
  async fn generate(&self, build_dir: &Path, source_dir: &Path, flags: &[String]) -> Result<(), BuildError>;

  /// Builds `scope` inside an already generated `build_dir`.
  async fn build(&self, build_dir: &Path, scope: &BuildScope) -> Result<(), BuildError>;
}
