use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use wbuild_lib::catalog::WorkflowCatalog;
use wbuild_lib::publish::Publisher;

use super::build::load_catalog;
use crate::output::{OutputFormat, print_check, print_info, print_json};

#[derive(Debug, Serialize)]
struct CatalogListing {
  store: PathBuf,
  workflows: Vec<WorkflowListing>,
}

#[derive(Debug, Serialize)]
struct WorkflowListing {
  name: String,
  stages: Vec<StageListing>,
}

#[derive(Debug, Serialize)]
struct StageListing {
  name: String,
  published: bool,
  artifact: PathBuf,
}

fn build_listing(catalog: &WorkflowCatalog, publisher: &Publisher) -> CatalogListing {
  let workflows = catalog
    .workflows()
    .map(|wf| WorkflowListing {
      name: wf.name.clone(),
      stages: wf
        .stages
        .iter()
        .map(|stage| StageListing {
          name: stage.clone(),
          published: publisher.is_published(&wf.name, stage),
          artifact: publisher.artifact_path(&wf.name, stage),
        })
        .collect(),
    })
    .collect();

  CatalogListing {
    store: publisher.store_root().to_path_buf(),
    workflows,
  }
}

/// Prints every workflow and stage, marking the ones present in the function store.
pub fn cmd_list(catalog: Option<&Path>, output: OutputFormat) -> Result<()> {
  let catalog = load_catalog(catalog)?;
  let listing = build_listing(&catalog, &Publisher::from_env());

  if output.is_json() {
    return print_json(&listing);
  }

  print_info(&format!("Function store: {}", listing.store.display()));
  for wf in &listing.workflows {
    println!();
    println!(
      "{} ({} stages)",
      wf.name.if_supports_color(Stream::Stdout, |s| s.bold()),
      wf.stages.len()
    );
    for stage in &wf.stages {
      print_check(stage.published, &stage.name);
    }
  }

  Ok(())
}
