//! Names shared across the crate: environment variables, file names and
//! directory conventions understood by the toolchain and runtime.

pub const APP_NAME: &str = "wbuild";

/// Environment variable that must be `on` for build commands to run.
pub const CONTAINER_SENTINEL_VAR: &str = "WBUILD_IN_CONTAINER";
pub const CONTAINER_SENTINEL_VALUE: &str = "on";

pub const FUNCTION_STORE_VAR: &str = "WBUILD_FUNCTION_STORE";
pub const WASM_TOOLCHAIN_FILE_VAR: &str = "WBUILD_WASM_TOOLCHAIN_FILE";
pub const WASM_CC_VAR: &str = "WBUILD_WASM_CC";
pub const WASM_CXX_VAR: &str = "WBUILD_WASM_CXX";
pub const NATIVE_CC_VAR: &str = "WBUILD_NATIVE_CC";
pub const NATIVE_CXX_VAR: &str = "WBUILD_NATIVE_CXX";
pub const CMAKE_VAR: &str = "WBUILD_CMAKE";
pub const NINJA_VAR: &str = "WBUILD_NINJA";

pub const BYTECODE_BUILD_DIR: &str = "build-wasm";
pub const NATIVE_BUILD_DIR: &str = "build-native";

/// Extension of bytecode artifacts produced by the wasm toolchain.
pub const BYTECODE_EXTENSION: &str = "wasm";

/// File name the runtime expects inside `<store>/<workflow>/<stage>/`.
pub const PUBLISHED_ARTIFACT_NAME: &str = "function.wasm";

/// Fingerprint of the flags used by the last successful generation phase.
pub const GENERATION_STAMP: &str = ".wbuild-generate";

pub const WORKFLOWS_DIR: &str = "workflows";
pub const APPLICATIONS_DIR: &str = "applications";
pub const UBENCH_DIR: &str = "ubench";
