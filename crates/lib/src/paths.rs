//! Locations of external collaborators: the runtime function store and the
//! toolchain binaries. Each one can be overridden through the environment.

use std::path::PathBuf;

use crate::consts::{
  CMAKE_VAR, FUNCTION_STORE_VAR, NATIVE_CC_VAR, NATIVE_CXX_VAR, NINJA_VAR, WASM_CC_VAR, WASM_CXX_VAR,
  WASM_TOOLCHAIN_FILE_VAR,
};

const DEFAULT_FUNCTION_STORE: &str = "/usr/local/faasm/wasm";
const DEFAULT_WASM_TOOLCHAIN_FILE: &str = "/usr/local/faasm/toolchain/tools/WasiToolchain.cmake";
const DEFAULT_WASM_CC: &str = "/usr/local/faasm/toolchain/bin/clang";
const DEFAULT_WASM_CXX: &str = "/usr/local/faasm/toolchain/bin/clang++";
const DEFAULT_NATIVE_CC: &str = "/usr/bin/clang-17";
const DEFAULT_NATIVE_CXX: &str = "/usr/bin/clang++-17";
const DEFAULT_CMAKE: &str = "cmake";
const DEFAULT_NINJA: &str = "ninja";

fn env_or(var: &str, default: &str) -> String {
  std::env::var(var)
    .ok()
    .filter(|v| !v.is_empty())
    .unwrap_or_else(|| default.to_string())
}

/// Root of the runtime's function store (`<root>/<workflow>/<stage>/function.wasm`).
pub fn function_store_dir() -> PathBuf {
  PathBuf::from(env_or(FUNCTION_STORE_VAR, DEFAULT_FUNCTION_STORE))
}

/// CMake toolchain file that targets the wasm sysroot.
pub fn wasm_toolchain_file() -> PathBuf {
  PathBuf::from(env_or(WASM_TOOLCHAIN_FILE_VAR, DEFAULT_WASM_TOOLCHAIN_FILE))
}

/// C and C++ compilers for the bytecode target.
pub fn wasm_compilers() -> (String, String) {
  (env_or(WASM_CC_VAR, DEFAULT_WASM_CC), env_or(WASM_CXX_VAR, DEFAULT_WASM_CXX))
}

/// C and C++ compilers for the native target.
pub fn native_compilers() -> (String, String) {
  (
    env_or(NATIVE_CC_VAR, DEFAULT_NATIVE_CC),
    env_or(NATIVE_CXX_VAR, DEFAULT_NATIVE_CXX),
  )
}

/// Program that runs the project-generation phase.
pub fn cmake_program() -> String {
  env_or(CMAKE_VAR, DEFAULT_CMAKE)
}

/// Program that runs the build phase.
pub fn ninja_program() -> String {
  env_or(NINJA_VAR, DEFAULT_NINJA)
}
