//! Options and reporting shared by the build subcommands.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use wbuild_lib::catalog::WorkflowCatalog;
use wbuild_lib::config::{BuildConfiguration, OptimizationLevel, TrustMaterial};
use wbuild_lib::driver::BuildReport;
use wbuild_lib::project::Project;
use wbuild_lib::target::BuildTarget;

use crate::output::{
  OutputFormat, format_duration, print_json, print_stat, print_step, print_success, print_warning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
  #[value(alias = "wasm")]
  Bytecode,
  Native,
}

impl From<TargetArg> for BuildTarget {
  fn from(arg: TargetArg) -> Self {
    match arg {
      TargetArg::Bytecode => BuildTarget::Bytecode,
      TargetArg::Native => BuildTarget::Native,
    }
  }
}

#[derive(Debug, Args)]
pub struct BuildArgs {
  /// Remove build directories and regenerate from scratch
  #[arg(long)]
  pub clean: bool,

  /// Build without optimizations
  #[arg(long)]
  pub debug: bool,

  /// Certificate file for native builds
  #[arg(long, value_name = "FILE", conflicts_with = "as_cert_dir")]
  pub as_cert_path: Option<PathBuf>,

  /// Directory of certificates for native builds
  #[arg(long, value_name = "DIR")]
  pub as_cert_dir: Option<PathBuf>,

  /// Target to build (repeatable, default depends on the project)
  #[arg(long = "target", value_enum)]
  pub targets: Vec<TargetArg>,
}

impl BuildArgs {
  pub fn targets(&self, project: Project) -> Vec<BuildTarget> {
    if self.targets.is_empty() {
      project.default_targets().to_vec()
    } else {
      self.targets.iter().map(|&t| t.into()).collect()
    }
  }

  pub fn configuration(&self) -> BuildConfiguration {
    let trust_material = match (&self.as_cert_path, &self.as_cert_dir) {
      (Some(file), _) => Some(TrustMaterial::File(file.clone())),
      (None, Some(dir)) => Some(TrustMaterial::Dir(dir.clone())),
      (None, None) => None,
    };

    BuildConfiguration {
      optimization: if self.debug {
        OptimizationLevel::Debug
      } else {
        OptimizationLevel::Release
      },
      clean: self.clean,
      trust_material,
      ..Default::default()
    }
  }
}

pub fn load_catalog(path: Option<&Path>) -> Result<WorkflowCatalog> {
  match path {
    Some(path) => Ok(WorkflowCatalog::load(path)?),
    None => Ok(WorkflowCatalog::builtin()),
  }
}

pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  Ok(rt.block_on(future))
}

pub fn print_report(project: Project, report: &BuildReport, elapsed: Duration, output: OutputFormat) -> Result<()> {
  if output.is_json() {
    return print_json(report);
  }

  for warning in &report.warnings {
    print_warning(&warning.to_string());
  }

  println!();
  for unit in &report.units {
    let mut line = format!("{} [{}]", unit.scope, unit.target);
    if unit.regenerated {
      line.push_str(" (generated)");
    }
    if let Some(dest) = &unit.published {
      line.push_str(&format!(" -> {}", dest.display()));
    }
    print_step(&line);
  }

  println!();
  print_success(&format!("Built {}", project));
  print_stat("Units built", &report.build_count().to_string());
  print_stat("Generated", &report.generation_count().to_string());
  print_stat("Published", &report.published().count().to_string());
  print_stat("Duration", &format_duration(elapsed));

  Ok(())
}
