//! Build fan-out.
//!
//! The driver walks a workflow catalog (or a list of standalone units) and,
//! for every requested target, prepares the build directory, runs the
//! generation phase when needed, builds the unit and publishes bytecode
//! artifacts. Everything runs sequentially in catalog order and the first
//! failure aborts the run: a partial artifact set is never reported as success.
//!
//! Generation is skipped on warm builds. It runs when the directory was just
//! created, when the run is clean, or when the generation flags differ from the
//! stamp left by the last successful generation. A clean run destroys and
//! recreates both build directories of the project once, before the first
//! unit, whichever targets were requested; every unit then regenerates.

mod types;

use std::path::Path;

use tracing::{debug, info};

use crate::catalog::WorkflowCatalog;
use crate::config::{self, BuildConfiguration, ValidatedConfig};
use crate::error::BuildError;
use crate::project::StandaloneUnit;
use crate::publish::Publisher;
use crate::state;
use crate::target::{self, BuildTarget, normalize_targets};
use crate::toolchain::{BuildScope, Profiles, Toolchain, generation_flags};
use crate::util::hash::fingerprint_args;

pub use types::{BuildReport, UnitReport};

/// Orchestrates builds against a [`Toolchain`] and a [`Publisher`].
pub struct Driver<T: Toolchain> {
  toolchain: T,
  publisher: Publisher,
  profiles: Profiles,
}

/// Per-run bookkeeping.
struct Run<'a> {
  validated: &'a ValidatedConfig,
  report: BuildReport,
}

impl<T: Toolchain> Driver<T> {
  pub fn new(toolchain: T, publisher: Publisher) -> Self {
    Self {
      toolchain,
      publisher,
      profiles: Profiles::from_env(),
    }
  }

  pub fn with_profiles(mut self, profiles: Profiles) -> Self {
    self.profiles = profiles;
    self
  }

  pub fn toolchain(&self) -> &T {
    &self.toolchain
  }

  pub fn publisher(&self) -> &Publisher {
    &self.publisher
  }

  /// Builds every stage of every workflow for every target, publishing bytecode.
  ///
  /// Order is workflow, then stage, then target (bytecode before native).
  /// Configuration is validated once, before any directory is touched.
  pub async fn run(
    &self,
    project_root: &Path,
    catalog: &WorkflowCatalog,
    targets: &[BuildTarget],
    config: &BuildConfiguration,
  ) -> Result<BuildReport, BuildError> {
    let validated = config::validate(config)?;
    let targets = normalize_targets(targets);
    let mut run = Run::new(&validated);
    if config.clean {
      clean_build_dirs(project_root)?;
    }

    info!(
      workflows = catalog.len(),
      stages = catalog.stage_count(),
      ?targets,
      clean = config.clean,
      "building workflow catalog"
    );

    for unit in catalog.units() {
      let scope = BuildScope::unit(unit.target_name());
      for &target in &targets {
        let mut report = self.build_unit(&mut run, project_root, project_root, target, &scope).await?;
        if target.publishes() {
          let published = self.publisher.publish(&report.build_dir, &unit.workflow, &unit.stage)?;
          report.published = Some(published);
        }
        run.report.units.push(report);
      }
    }

    Ok(run.finish())
  }

  /// Builds standalone units (applications, microbenchmarks) for every target.
  ///
  /// Order is target, then unit. Nothing is published: native binaries execute
  /// in place and standalone bytecode is not addressed by the function store.
  pub async fn run_project(
    &self,
    project_root: &Path,
    units: &[StandaloneUnit],
    targets: &[BuildTarget],
    config: &BuildConfiguration,
  ) -> Result<BuildReport, BuildError> {
    let validated = config::validate(config)?;
    let targets = normalize_targets(targets);
    let mut run = Run::new(&validated);
    if config.clean {
      clean_build_dirs(project_root)?;
    }

    info!(
      project = %project_root.display(),
      units = units.len(),
      ?targets,
      clean = config.clean,
      "building project"
    );

    for &target in &targets {
      for unit in units {
        let report = self
          .build_unit(&mut run, project_root, &unit.source_dir, target, &unit.scope)
          .await?;
        run.report.units.push(report);
      }
    }

    Ok(run.finish())
  }

  async fn build_unit(
    &self,
    run: &mut Run<'_>,
    project_root: &Path,
    source_dir: &Path,
    target: BuildTarget,
    scope: &BuildScope,
  ) -> Result<UnitReport, BuildError> {
    let validated = run.validated;
    let config = validated.config();
    let build_dir = target::resolve(project_root, target);

    let prepared = state::prepare(&build_dir, false)?;

    let flags = generation_flags(target, self.profiles.get(target), validated);
    let mut fingerprinted = flags.clone();
    fingerprinted.push(source_dir.display().to_string());
    let fingerprint = fingerprint_args(&fingerprinted);

    let regenerate = prepared.must_regenerate || config.clean || !state::stamp_matches(&build_dir, &fingerprint);
    if regenerate {
      state::clear_stamp(&build_dir)?;
      self.toolchain.generate(&build_dir, source_dir, &flags).await?;
      state::write_stamp(&build_dir, &fingerprint)?;
    } else {
      debug!(%scope, %target, "generation up to date, skipping");
    }

    self.toolchain.build(&build_dir, scope).await?;
    info!(%scope, %target, regenerated = regenerate, "built");

    Ok(UnitReport {
      scope: scope.to_string(),
      target,
      build_dir,
      regenerated: regenerate,
      published: None,
    })
  }
}

/// Destroys and recreates the build directory of every target under `project_root`.
fn clean_build_dirs(project_root: &Path) -> Result<(), BuildError> {
  for target in BuildTarget::ALL {
    state::prepare(&target::resolve(project_root, target), true)?;
  }
  Ok(())
}

impl<'a> Run<'a> {
  fn new(validated: &'a ValidatedConfig) -> Self {
    Self {
      validated,
      report: BuildReport {
        units: Vec::new(),
        warnings: validated.warnings.clone(),
      },
    }
  }

  fn finish(self) -> BuildReport {
    self.report
  }
}
