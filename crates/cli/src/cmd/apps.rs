use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use wbuild_lib::driver::Driver;
use wbuild_lib::precondition;
use wbuild_lib::project::{Project, application_units};
use wbuild_lib::publish::Publisher;
use wbuild_lib::toolchain::CmakeToolchain;

use super::build::{BuildArgs, block_on, print_report};
use crate::output::OutputFormat;

pub fn cmd_apps(root: &Path, args: &BuildArgs, output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  precondition::ensure_container()?;

  let project_root = Project::Applications.root(root);
  let units = application_units(&project_root);
  let targets = args.targets(Project::Applications);
  let config = args.configuration();

  let driver = Driver::new(CmakeToolchain::from_env(), Publisher::from_env());
  let report =
    block_on(driver.run_project(&project_root, &units, &targets, &config))?.context("Application build failed")?;

  print_report(Project::Applications, &report, start.elapsed(), output)
}
