use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

use wbuild_lib::project::Project;
use wbuild_lib::state::remove_build_dir;
use wbuild_lib::target::{self, BuildTarget};

use crate::output::{OutputFormat, format_bytes, format_duration, print_json, print_stat, print_step, print_success};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProjectArg {
  Workflows,
  #[value(alias = "applications")]
  Apps,
  Ubench,
}

impl From<ProjectArg> for Project {
  fn from(arg: ProjectArg) -> Self {
    match arg {
      ProjectArg::Workflows => Project::Workflows,
      ProjectArg::Apps => Project::Applications,
      ProjectArg::Ubench => Project::Ubench,
    }
  }
}

#[derive(Debug, Serialize)]
struct RemovedDir {
  path: PathBuf,
  bytes: u64,
}

#[derive(Debug, Default, Serialize)]
struct CleanResult {
  removed: Vec<RemovedDir>,
  bytes_freed: u64,
}

fn clean_projects(root: &Path, projects: &[Project]) -> Result<CleanResult> {
  let mut result = CleanResult::default();
  for &project in projects {
    for target in BuildTarget::ALL {
      let build_dir = target::resolve(&project.root(root), target);
      if let Some(bytes) = remove_build_dir(&build_dir)? {
        result.bytes_freed += bytes;
        result.removed.push(RemovedDir { path: build_dir, bytes });
      }
    }
  }
  Ok(result)
}

/// Removes the build directories of the given projects (all of them when none are named).
pub fn cmd_clean(root: &Path, projects: &[ProjectArg], output: OutputFormat) -> Result<()> {
  let start = Instant::now();

  let projects: Vec<Project> = if projects.is_empty() {
    Project::ALL.to_vec()
  } else {
    projects.iter().map(|&p| p.into()).collect()
  };

  debug!(?projects, root = %root.display(), "cleaning build directories");
  let result = clean_projects(root, &projects)?;

  if output.is_json() {
    print_json(&result)?;
  } else {
    println!();
    for dir in &result.removed {
      print_step(&format!("{} ({})", dir.path.display(), format_bytes(dir.bytes)));
    }
    print_success("Clean complete!");
    print_stat("Directories removed", &result.removed.len().to_string());
    print_stat("Space freed", &format_bytes(result.bytes_freed));
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}
