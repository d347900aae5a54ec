mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{BuildArgs, ProjectArg, cmd_apps, cmd_clean, cmd_list, cmd_ubench, cmd_workflows};
use output::{OutputFormat, print_error};
use wbuild_lib::consts::APP_NAME;

/// wbuild - build workflow functions for the bytecode and native targets
#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Repository root containing the workflows, applications and ubench trees
  #[arg(long, global = true, env = "WBUILD_ROOT")]
  root: Option<PathBuf>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build every stage of every workflow and publish bytecode to the function store
  Workflows {
    #[command(flatten)]
    build: BuildArgs,

    /// Build with threading support
    #[arg(long)]
    threads: bool,

    /// Only build the named workflow (repeatable)
    #[arg(long = "workflow", value_name = "NAME")]
    workflows: Vec<String>,

    /// Catalog file to use instead of the built-in one
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,
  },

  /// Build the applications tree
  Apps {
    #[command(flatten)]
    build: BuildArgs,
  },

  /// Build the microbenchmarks
  Ubench {
    #[command(flatten)]
    build: BuildArgs,

    /// Compile in timing instrumentation
    #[arg(long)]
    time: bool,
  },

  /// List the workflow catalog and what is published
  List {
    /// Catalog file to use instead of the built-in one
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,
  },

  /// Remove build directories
  Clean {
    /// Project to clean (repeatable, default: all)
    #[arg(long = "project", value_enum)]
    projects: Vec<ProjectArg>,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  // toolchain output is always shown; everything else only with -v
  let default_filter = if cli.verbose {
    "debug"
  } else {
    "error,wbuild_lib::toolchain=info"
  };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let root = match cli.root {
    Some(root) => root,
    None => std::env::current_dir().context("Failed to determine current directory")?,
  };

  match cli.command {
    Commands::Workflows {
      build,
      threads,
      workflows,
      catalog,
    } => cmd_workflows(&root, &build, threads, &workflows, catalog.as_deref(), cli.output),
    Commands::Apps { build } => cmd_apps(&root, &build, cli.output),
    Commands::Ubench { build, time } => cmd_ubench(&root, &build, time, cli.output),
    Commands::List { catalog } => cmd_list(catalog.as_deref(), cli.output),
    Commands::Clean { projects } => cmd_clean(&root, &projects, cli.output),
  }
}
