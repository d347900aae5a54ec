//! Workflow catalog: the static mapping of workflow name to its ordered stages.
//!
//! Stage order follows the pipeline (a driver before the stages it fans out
//! to) but the builder treats every stage as an independent compilation unit
//! sharing one project tree, so no dependency-respecting order is enforced.
//!
//! Catalogs are either the built-in one or loaded from a JSON file:
//!
//! ```json
//! { "workflows": [ { "name": "word-count", "stages": ["driver", "splitter"] } ] }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::BYTECODE_EXTENSION;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("workflow name must not be empty")]
  EmptyWorkflowName,

  #[error("duplicate workflow: {0}")]
  DuplicateWorkflow(String),

  #[error("workflow {workflow} has an empty stage name at position {index}")]
  EmptyStageName { workflow: String, index: usize },

  #[error("workflow {workflow} lists stage {stage} more than once")]
  DuplicateStage { workflow: String, stage: String },

  /// The name would not stay a single directory level inside the function store.
  #[error("{kind} name {name:?} must not contain path separators or be '.' or '..'")]
  UnsafeName { kind: &'static str, name: String },

  #[error("unknown workflow: {0}")]
  UnknownWorkflow(String),

  #[error("failed to read catalog {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse catalog {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },
}

/// A named pipeline of function stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
  pub name: String,
  pub stages: Vec<String>,
}

/// One function stage of one workflow: the unit the toolchain builds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompilationUnit {
  pub workflow: String,
  pub stage: String,
}

impl CompilationUnit {
  pub fn new(workflow: impl Into<String>, stage: impl Into<String>) -> Self {
    Self {
      workflow: workflow.into(),
      stage: stage.into(),
    }
  }

  /// Build-system target name, `<workflow>_<stage>`.
  pub fn target_name(&self) -> String {
    format!("{}_{}", self.workflow, self.stage)
  }

  /// File name of the bytecode artifact, `<workflow>_<stage>.wasm`.
  pub fn bytecode_artifact_name(&self) -> String {
    format!("{}.{}", self.target_name(), BYTECODE_EXTENSION)
  }
}

impl fmt::Display for CompilationUnit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.workflow, self.stage)
  }
}

#[derive(Deserialize)]
struct CatalogFile {
  #[serde(default)]
  workflows: Vec<Workflow>,
}

/// Names become store path components, so each must be exactly one normal component.
fn is_path_safe(name: &str) -> bool {
  !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// Ordered mapping of workflow name to stage names. Iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowCatalog {
  workflows: Vec<Workflow>,
}

impl WorkflowCatalog {
  /// Builds a catalog, validating every workflow in order.
  pub fn new(workflows: impl IntoIterator<Item = Workflow>) -> Result<Self, CatalogError> {
    let mut catalog = Self::default();
    for wf in workflows {
      catalog.insert(wf.name, wf.stages)?;
    }
    Ok(catalog)
  }

  /// The workflows shipped with the repository.
  pub fn builtin() -> Self {
    const BUILTIN: &[(&str, &[&str])] = &[
      ("word-count", &["driver", "splitter", "mapper", "reducer"]),
      ("finra", &["driver", "fetch-public", "fetch-private", "audit", "merge"]),
      ("ml-training", &["driver", "partition", "pca", "rf", "validation"]),
      ("ml-inference", &["driver", "load", "partition", "predict"]),
    ];

    Self {
      workflows: BUILTIN
        .iter()
        .map(|(name, stages)| Workflow {
          name: name.to_string(),
          stages: stages.iter().map(|s| s.to_string()).collect(),
        })
        .collect(),
    }
  }

  /// Loads and validates a JSON catalog file.
  pub fn load(path: &Path) -> Result<Self, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    let file: CatalogFile = serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    Self::new(file.workflows)
  }

  /// Appends a workflow, keeping insertion order.
  pub fn insert(&mut self, name: impl Into<String>, stages: Vec<String>) -> Result<(), CatalogError> {
    let name = name.into();
    if name.is_empty() {
      return Err(CatalogError::EmptyWorkflowName);
    }
    if !is_path_safe(&name) {
      return Err(CatalogError::UnsafeName { kind: "workflow", name });
    }
    if self.get(&name).is_some() {
      return Err(CatalogError::DuplicateWorkflow(name));
    }

    let mut seen = HashSet::new();
    for (index, stage) in stages.iter().enumerate() {
      if stage.is_empty() {
        return Err(CatalogError::EmptyStageName { workflow: name, index });
      }
      if !is_path_safe(stage) {
        return Err(CatalogError::UnsafeName {
          kind: "stage",
          name: stage.clone(),
        });
      }
      if !seen.insert(stage.as_str()) {
        return Err(CatalogError::DuplicateStage {
          workflow: name,
          stage: stage.clone(),
        });
      }
    }

    self.workflows.push(Workflow { name, stages });
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<&Workflow> {
    self.workflows.iter().find(|wf| wf.name == name)
  }

  pub fn workflows(&self) -> impl Iterator<Item = &Workflow> {
    self.workflows.iter()
  }

  pub fn is_empty(&self) -> bool {
    self.workflows.is_empty()
  }

  pub fn len(&self) -> usize {
    self.workflows.len()
  }

  /// Total number of stages across all workflows.
  pub fn stage_count(&self) -> usize {
    self.workflows.iter().map(|wf| wf.stages.len()).sum()
  }

  /// Every (workflow, stage) pair in catalog order.
  pub fn units(&self) -> impl Iterator<Item = CompilationUnit> + '_ {
    self
      .workflows
      .iter()
      .flat_map(|wf| wf.stages.iter().map(move |stage| CompilationUnit::new(&wf.name, stage)))
  }

  /// Narrows the catalog to the named workflows, in catalog order.
  ///
  /// An empty selection keeps everything.
  pub fn select(&self, names: &[String]) -> Result<Self, CatalogError> {
    if names.is_empty() {
      return Ok(self.clone());
    }
    if let Some(unknown) = names.iter().find(|n| self.get(n).is_none()) {
      return Err(CatalogError::UnknownWorkflow(unknown.clone()));
    }
    Ok(Self {
      workflows: self
        .workflows
        .iter()
        .filter(|wf| names.contains(&wf.name))
        .cloned()
        .collect(),
    })
  }
}
