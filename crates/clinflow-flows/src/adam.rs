use std::collections::HashMap;
use std::sync::Arc;

use clinflow_artifact::{ArtifactRegistry, ArtifactTag, RegistryError, tags};
use clinflow_config::{ArtifactCategory, EnvironmentDef, ValueType};
use clinflow_workflow::{InputBinding, OutputRef, OutputSpec, ParameterSpec, WorkflowBuilder};

use crate::error::CatalogError;

/// Name of the input carrying the SDTM snapshot path into a job.
pub(crate) const SNAPSHOT_INPUT: &str = "sdtm_snapshot_task_input";

/// ADaM datasets derived from ADSL, in declaration order.
pub(crate) const ADAM_DOMAINS: [&str; 5] = ["ADAE", "ADCM", "ADLB", "ADMH", "ADVS"];

pub(crate) fn dataset_type() -> ValueType {
  ValueType::file("sas7bdat")
}

pub(crate) fn snapshot_input(snapshot: &ParameterSpec) -> InputBinding {
  InputBinding::new(SNAPSHOT_INPUT, ValueType::String, snapshot)
}

/// Production or independent QC programming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Track {
  Prod,
  Qc,
}

impl Track {
  /// Prefix in node names: "Create QC ADSL Dataset".
  pub(crate) fn task_prefix(self) -> &'static str {
    match self {
      Self::Prod => "",
      Self::Qc => "QC ",
    }
  }

  /// Prefix in output, file and program names: "qc_adsl_dataset".
  pub(crate) fn name_prefix(self) -> &'static str {
    match self {
      Self::Prod => "",
      Self::Qc => "qc_",
    }
  }

  pub(crate) fn dataset_tag(
    self,
    registry: &mut ArtifactRegistry,
  ) -> Result<Arc<ArtifactTag>, RegistryError> {
    let name = match self {
      Self::Prod => tags::ADAM_DATASETS,
      Self::Qc => tags::QC_ADAM_DATASETS,
    };
    registry.get_or_create_tag(name, ArtifactCategory::Data)
  }

  pub(crate) fn report_tag(
    self,
    registry: &mut ArtifactRegistry,
  ) -> Result<Arc<ArtifactTag>, RegistryError> {
    let name = match self {
      Self::Prod => tags::TFL_REPORTS,
      Self::Qc => tags::QC_TFL_REPORTS,
    };
    registry.get_or_create_tag(name, ArtifactCategory::Report)
  }

  fn adam_command(self, domain: &str) -> String {
    match self {
      Self::Prod => format!("prod/adam/{}.sas", domain),
      Self::Qc => format!("qc/adam/qc_{}.sas", domain),
    }
  }
}

/// How published artifact files are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileNaming {
  /// "adsl", the platform adds the extension from the declared type.
  Bare,
  /// "adsl.sas7bdat"
  WithExtension,
}

impl FileNaming {
  pub(crate) fn file_name(self, stem: &str, extension: &str) -> String {
    match self {
      Self::Bare => stem.to_string(),
      Self::WithExtension => format!("{}.{}", stem, extension),
    }
  }
}

/// ADaM dataset outputs of one track, keyed by lower-case domain.
#[derive(Debug, Default)]
pub(crate) struct AdamOutputs {
  track_prefix: &'static str,
  datasets: HashMap<String, OutputRef>,
}

impl AdamOutputs {
  pub(crate) fn new(track: Track) -> Self {
    Self {
      track_prefix: track.name_prefix(),
      datasets: HashMap::new(),
    }
  }

  pub(crate) fn insert(&mut self, domain: &str, output: OutputRef) {
    self.datasets.insert(domain.to_lowercase(), output);
  }

  /// Input binding that reads `domain`, named after the dataset output.
  pub(crate) fn input(&self, domain: &str) -> Result<InputBinding, CatalogError> {
    let domain = domain.to_lowercase();
    let output = self
      .datasets
      .get(&domain)
      .ok_or_else(|| CatalogError::MissingDataset(format!("{}{}", self.track_prefix, domain)))?;

    Ok(InputBinding::new(
      output.output.clone(),
      dataset_type(),
      output.clone(),
    ))
  }
}

/// Declare ADSL and the ADSL-derived datasets, each reading the snapshot
/// directly (flows 1-4).
pub(crate) fn add_snapshot_adam(
  builder: &mut WorkflowBuilder,
  track: Track,
  tag: &Arc<ArtifactTag>,
  snapshot: &ParameterSpec,
  env: &EnvironmentDef,
) -> Result<AdamOutputs, CatalogError> {
  let mut outputs = AdamOutputs::new(track);

  let adsl = add_dataset_node(
    builder,
    track,
    "ADSL",
    vec![snapshot_input(snapshot)],
    tag,
    env,
  )?;
  outputs.insert("ADSL", adsl);

  for domain in ADAM_DOMAINS {
    let inputs = vec![snapshot_input(snapshot), outputs.input("ADSL")?];
    let output = add_dataset_node(builder, track, domain, inputs, tag, env)?;
    outputs.insert(domain, output);
  }

  Ok(outputs)
}

fn add_dataset_node(
  builder: &mut WorkflowBuilder,
  track: Track,
  domain: &str,
  inputs: Vec<InputBinding>,
  tag: &Arc<ArtifactTag>,
  env: &EnvironmentDef,
) -> Result<OutputRef, CatalogError> {
  let stem = format!("{}{}", track.name_prefix(), domain.to_lowercase());
  let output_name = format!("{}_dataset", stem);

  let handle = builder.add_job_node(
    format!("Create {}{} Dataset", track.task_prefix(), domain),
    track.adam_command(domain),
    inputs,
    vec![OutputSpec::new(&output_name, dataset_type()).tagged(tag, stem)],
    env.clone(),
  )?;

  Ok(handle.output(&output_name)?)
}
