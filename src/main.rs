mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinflow_artifact::ArtifactRegistry;
use clinflow_config::WorkflowDef;
use clinflow_flows::Catalog;
use clinflow_resolver::{Resolver, StandardResolver};
use clinflow_transfer::{CopyOutcome, SnapshotCopy, adam_blobs, download_blobs, load_manifest};
use clinflow_workflow::Invocation;

use settings::Settings;

/// clinflow - declare and launch clinical SDTM/ADaM/TFL workflows
#[derive(Parser)]
#[command(name = "clinflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.clinflow)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Inspect and submit catalog flows
  Flows {
    #[command(subcommand)]
    action: FlowsAction,
  },

  /// Validate a workflow file
  Validate {
    /// Path to the workflow file (JSON)
    workflow_file: PathBuf,
  },

  /// File relocation utilities run inside jobs
  Transfer {
    #[command(subcommand)]
    action: TransferAction,
  },
}

#[derive(Subcommand)]
enum FlowsAction {
  /// List catalog flows
  List,

  /// Print a flow's definition as JSON
  Show {
    /// Flow id, e.g. flow_2
    id: String,

    /// Print execution stages instead of the definition
    #[arg(long)]
    stages: bool,
  },

  /// Bind launch parameters and print the submission as JSON
  Submit {
    /// Flow id, e.g. flow_2
    id: String,

    /// Parameter value (name=value)
    #[arg(short, long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Run name
    #[arg(long)]
    name: Option<String>,
  },
}

#[derive(Subcommand)]
enum TransferAction {
  /// Copy one SDTM dataset out of the mounted snapshot
  Snapshot {
    /// SDTM domain to copy
    #[arg(long, default_value = clinflow_transfer::DEFAULT_DATASET)]
    dataset: String,

    #[arg(long, default_value = clinflow_transfer::DEFAULT_INPUTS_DIR)]
    inputs_dir: PathBuf,

    #[arg(long, default_value = clinflow_transfer::DEFAULT_OUTPUTS_DIR)]
    outputs_dir: PathBuf,

    /// Input whose file holds the snapshot path
    #[arg(long, default_value = clinflow_transfer::DEFAULT_INPUT_NAME)]
    input_name: String,

    /// Fail when the dataset is not in the snapshot
    #[arg(long)]
    strict: bool,
  },

  /// Download published blobs into a directory
  Blobs {
    output_dir: PathBuf,

    /// JSON list of {"uri", "local_filename"}; defaults to the ADaM datasets
    #[arg(long)]
    manifest: Option<PathBuf>,
  },
}

fn parse_param(s: &str) -> std::result::Result<(String, String), String> {
  let (name, value) = s
    .split_once('=')
    .ok_or_else(|| format!("invalid parameter '{}', expected name=value", s))?;
  Ok((name.to_string(), value.to_string()))
}

fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(tracing_subscriber::EnvFilter::new(
      std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
    ))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();

  let Some(command) = cli.command else {
    println!("clinflow - use --help to see available commands");
    return Ok(());
  };

  match command {
    Commands::Flows { action } => {
      let data_dir = resolve_data_dir(cli.data_dir)?;
      let settings = Settings::load(&data_dir)?;
      let catalog = Catalog::new(settings.flows);
      match action {
        FlowsAction::List => list_flows(&catalog)?,
        FlowsAction::Show { id, stages } => show_flow(&catalog, &id, stages)?,
        FlowsAction::Submit { id, params, name } => submit_flow(&catalog, &id, params, name)?,
      }
    }
    Commands::Validate { workflow_file } => validate(workflow_file)?,
    Commands::Transfer { action } => {
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(async { run_transfer(action).await })?;
    }
  }

  Ok(())
}

fn resolve_data_dir(data_dir: Option<PathBuf>) -> Result<PathBuf> {
  match data_dir {
    Some(dir) => Ok(dir),
    None => dirs::home_dir()
      .map(|home| home.join(".clinflow"))
      .context("could not determine home directory"),
  }
}

fn list_flows(catalog: &Catalog) -> Result<()> {
  let mut registry = ArtifactRegistry::new();
  for (entry, workflow) in catalog.build_all(&mut registry)? {
    let parameters: Vec<&str> = workflow
      .parameters()
      .iter()
      .map(|p| p.name.as_str())
      .collect();
    println!(
      "{:<22} {:<15} {:>3} nodes  [{}]  {}",
      entry.id,
      entry.workflow,
      workflow.nodes().len(),
      parameters.join(", "),
      entry.description
    );
  }
  Ok(())
}

fn show_flow(catalog: &Catalog, id: &str, stages: bool) -> Result<()> {
  let mut registry = ArtifactRegistry::new();
  let workflow = catalog.build(id, &mut registry)?;

  if stages {
    for (i, stage) in workflow.graph().stages().iter().enumerate() {
      println!("stage {}:", i);
      for node in stage {
        println!("  {}", node);
      }
    }
  } else {
    println!("{}", serde_json::to_string_pretty(&workflow.to_def())?);
  }
  Ok(())
}

fn submit_flow(
  catalog: &Catalog,
  id: &str,
  params: Vec<(String, String)>,
  name: Option<String>,
) -> Result<()> {
  let mut registry = ArtifactRegistry::new();
  let workflow = catalog.build(id, &mut registry)?;

  let mut invocation = Invocation::new();
  if let Some(name) = name {
    invocation = invocation.with_run_name(name);
  }
  for (param, value) in params {
    invocation = invocation.with_parameter(param, value);
  }

  let submission = invocation
    .bind(&workflow)
    .with_context(|| format!("invalid parameters for {}", id))?;
  println!("{}", serde_json::to_string_pretty(&submission)?);
  Ok(())
}

fn validate(workflow_file: PathBuf) -> Result<()> {
  let content = std::fs::read_to_string(&workflow_file)
    .with_context(|| format!("failed to read workflow file: {}", workflow_file.display()))?;

  let workflow_def: WorkflowDef = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse workflow file: {}", workflow_file.display()))?;

  let mut registry = ArtifactRegistry::new();
  let workflow = StandardResolver::new(&mut registry)
    .resolve(workflow_def)
    .context("failed to resolve workflow")?;

  let graph = workflow.graph();
  println!("{}: valid", workflow.name());
  println!("  nodes:        {}", workflow.nodes().len());
  println!("  entry points: {}", graph.entry_points().join(", "));
  println!("  stages:       {}", graph.stages().len());
  for group in workflow.artifact_groups() {
    println!(
      "  artifact:     {} ({}, {} outputs)",
      group.tag.name(),
      group.tag.category(),
      group.outputs.len()
    );
  }
  Ok(())
}

async fn run_transfer(action: TransferAction) -> Result<()> {
  match action {
    TransferAction::Snapshot {
      dataset,
      inputs_dir,
      outputs_dir,
      input_name,
      strict,
    } => {
      let copy = SnapshotCopy::new(dataset)
        .with_inputs_dir(inputs_dir)
        .with_outputs_dir(outputs_dir)
        .with_input_name(input_name);

      let outcome = copy.run().await.context("snapshot copy failed")?;
      if let CopyOutcome::NotFound { path } = outcome
        && strict
      {
        bail!("dataset not found in snapshot: {}", path.display());
      }
    }
    TransferAction::Blobs {
      output_dir,
      manifest,
    } => {
      let blobs = match manifest {
        Some(path) => load_manifest(&path).await?,
        None => adam_blobs(),
      };

      let written = download_blobs(&blobs, &output_dir)
        .await
        .context("blob download failed")?;
      eprintln!("Downloaded {} files to {}", written.len(), output_dir.display());
    }
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_param() {
    assert_eq!(
      parse_param("sdtm_dataset_snapshot=/mnt/imported/data/SDTMBLIND").unwrap(),
      (
        "sdtm_dataset_snapshot".to_string(),
        "/mnt/imported/data/SDTMBLIND".to_string()
      )
    );
    assert_eq!(
      parse_param("filter=a=b").unwrap(),
      ("filter".to_string(), "a=b".to_string())
    );
    assert!(parse_param("no_value").is_err());
  }

  #[test]
  fn test_cli_parses() {
    let cli = Cli::try_parse_from([
      "clinflow",
      "flows",
      "submit",
      "flow_2",
      "--param",
      "sdtm_dataset_snapshot=/mnt/imported/data/SDTMBLIND",
      "-p",
      "metadata_snapshot=/mnt/data/METADATA",
      "--name",
      "weekly",
    ])
    .unwrap();

    let Some(Commands::Flows {
      action: FlowsAction::Submit { id, params, name },
    }) = cli.command
    else {
      panic!("expected flows submit");
    };
    assert_eq!(id, "flow_2");
    assert_eq!(params.len(), 2);
    assert_eq!(name.as_deref(), Some("weekly"));
  }

  fn snapshot_action(root: &std::path::Path, strict: bool) -> TransferAction {
    let inputs = root.join("inputs");
    let snapshot = root.join("SDTMBLIND");
    std::fs::create_dir_all(&inputs).unwrap();
    std::fs::create_dir_all(&snapshot).unwrap();
    std::fs::write(
      inputs.join("sdtm_snapshot_task_input"),
      snapshot.display().to_string(),
    )
    .unwrap();

    TransferAction::Snapshot {
      dataset: "ta".to_string(),
      inputs_dir: inputs,
      outputs_dir: root.join("outputs"),
      input_name: "sdtm_snapshot_task_input".to_string(),
      strict,
    }
  }

  #[tokio::test]
  async fn test_missing_dataset_succeeds_by_default() {
    let root = tempfile::tempdir().unwrap();
    let action = snapshot_action(root.path(), false);

    run_transfer(action).await.unwrap();
    assert!(!root.path().join("outputs/ta.sas7bdat").exists());
  }

  #[tokio::test]
  async fn test_missing_dataset_fails_when_strict() {
    let root = tempfile::tempdir().unwrap();
    let action = snapshot_action(root.path(), true);

    let err = run_transfer(action).await.unwrap_err();
    assert!(err.to_string().contains("ta.sas7bdat"));
  }

  #[tokio::test]
  async fn test_strict_copy_of_present_dataset() {
    let root = tempfile::tempdir().unwrap();
    let action = snapshot_action(root.path(), true);
    std::fs::write(root.path().join("SDTMBLIND/ta.sas7bdat"), b"trial arms").unwrap();

    run_transfer(action).await.unwrap();
    assert_eq!(
      std::fs::read(root.path().join("outputs/ta.sas7bdat")).unwrap(),
      b"trial arms"
    );
  }

  #[test]
  fn test_transfer_defaults() {
    let cli = Cli::try_parse_from(["clinflow", "transfer", "snapshot"]).unwrap();
    let Some(Commands::Transfer {
      action:
        TransferAction::Snapshot {
          dataset,
          inputs_dir,
          strict,
          ..
        },
    }) = cli.command
    else {
      panic!("expected transfer snapshot");
    };
    assert_eq!(dataset, "ta");
    assert_eq!(inputs_dir, PathBuf::from("/workflow/inputs"));
    assert!(!strict);
  }
}
