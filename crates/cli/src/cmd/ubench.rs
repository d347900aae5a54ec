use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use wbuild_lib::driver::Driver;
use wbuild_lib::precondition;
use wbuild_lib::project::{Project, microbenchmark_units};
use wbuild_lib::publish::Publisher;
use wbuild_lib::toolchain::CmakeToolchain;

use super::build::{BuildArgs, block_on, print_report};
use crate::output::OutputFormat;

/// Builds every microbenchmark, optionally with timing instrumentation.
pub fn cmd_ubench(root: &Path, args: &BuildArgs, time: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  precondition::ensure_container()?;

  let project_root = Project::Ubench.root(root);
  let units = microbenchmark_units(&project_root);
  let targets = args.targets(Project::Ubench);
  let mut config = args.configuration();
  config.timing = time;

  let driver = Driver::new(CmakeToolchain::from_env(), Publisher::from_env());
  let report =
    block_on(driver.run_project(&project_root, &units, &targets, &config))?.context("Microbenchmark build failed")?;

  print_report(Project::Ubench, &report, start.elapsed(), output)
}
