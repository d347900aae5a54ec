use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use wbuild_lib::driver::Driver;
use wbuild_lib::precondition;
use wbuild_lib::project::Project;
use wbuild_lib::publish::Publisher;
use wbuild_lib::toolchain::CmakeToolchain;

use super::build::{BuildArgs, block_on, load_catalog, print_report};
use crate::output::OutputFormat;

/// Builds the selected workflows and publishes their bytecode.
pub fn cmd_workflows(
  root: &Path,
  args: &BuildArgs,
  threads: bool,
  workflows: &[String],
  catalog: Option<&Path>,
  output: OutputFormat,
) -> Result<()> {
  let start = Instant::now();

  precondition::ensure_container()?;

  let catalog = load_catalog(catalog)?.select(workflows)?;
  debug!(workflows = catalog.len(), root = %root.display(), "selected catalog");
  let targets = args.targets(Project::Workflows);
  let mut config = args.configuration();
  config.threading = threads;

  let driver = Driver::new(CmakeToolchain::from_env(), Publisher::from_env());
  let project_root = Project::Workflows.root(root);
  let report = block_on(driver.run(&project_root, &catalog, &targets, &config))?.context("Workflow build failed")?;

  print_report(Project::Workflows, &report, start.elapsed(), output)
}
