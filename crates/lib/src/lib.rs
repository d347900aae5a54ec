//! wbuild-lib: build orchestration for workflow functions
//!
//! This crate compiles a catalog of workflows into artifacts for two targets:
//! - `catalog`: workflow name -> ordered function stages
//! - `target`: bytecode (wasm) and native build directories
//! - `config`: build configuration and trust-material validation
//! - `state`: build directory lifecycle and regeneration gating
//! - `toolchain`: the external generate + build toolchain
//! - `publish`: copies bytecode artifacts into the runtime function store
//! - `driver`: fan-out over catalogs and standalone projects
//! - `project`: the workflow, application and microbenchmark trees

pub mod catalog;
pub mod config;
pub mod consts;
pub mod driver;
pub mod error;
pub mod paths;
pub mod precondition;
pub mod project;
pub mod publish;
pub mod state;
pub mod target;
pub mod toolchain;
pub mod util;
