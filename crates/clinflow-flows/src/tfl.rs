use std::sync::Arc;

use clinflow_artifact::ArtifactTag;
use clinflow_config::{EnvironmentDef, ValueType};
use clinflow_workflow::{InputBinding, OutputSpec, ParameterSpec, WorkflowBuilder};

use crate::adam::{AdamOutputs, FileNaming, Track};
use crate::error::CatalogError;

/// Reports and the ADaM datasets each one reads.
const REPORTS: [(&str, &[&str]); 3] = [
  ("t_pop", &["ADSL"]),
  ("t_ae_rel", &["ADSL", "ADAE"]),
  ("t_vscat", &["ADVS"]),
];

/// Where the report programs live and how their PDFs are named.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReportLayout {
  pub track: Track,
  /// Program directory, e.g. `prod/tfl`.
  pub directory: &'static str,
  pub naming: FileNaming,
}

impl ReportLayout {
  pub(crate) const PROD: Self = Self {
    track: Track::Prod,
    directory: "prod/tfl",
    naming: FileNaming::Bare,
  };

  pub(crate) const QC: Self = Self {
    track: Track::Qc,
    directory: "qc/tfl",
    naming: FileNaming::Bare,
  };

  pub(crate) const DEV: Self = Self {
    track: Track::Prod,
    directory: "prod/tfl_flows",
    naming: FileNaming::WithExtension,
  };
}

/// Declare one report node per TFL, each reading its datasets from
/// `datasets` plus the metadata snapshot.
pub(crate) fn add_reports(
  builder: &mut WorkflowBuilder,
  layout: ReportLayout,
  datasets: &AdamOutputs,
  metadata: &ParameterSpec,
  tag: &Arc<ArtifactTag>,
  env: &EnvironmentDef,
) -> Result<(), CatalogError> {
  let prefix = layout.track.name_prefix();

  for (report, sources) in REPORTS {
    let mut inputs = sources
      .iter()
      .map(|domain| datasets.input(domain))
      .collect::<Result<Vec<_>, _>>()?;
    inputs.push(InputBinding::new(&metadata.name, ValueType::String, metadata));

    let output_name = format!("{}{}", prefix, report);
    let file_name = layout.naming.file_name(&output_name, "pdf");

    builder.add_job_node(
      format!(
        "Create {}{} Report",
        layout.track.task_prefix(),
        report.to_uppercase()
      ),
      format!("{}/{}.sas", layout.directory, output_name),
      inputs,
      vec![OutputSpec::new(&output_name, ValueType::file("pdf")).tagged(tag, file_name)],
      env.clone(),
    )?;
  }

  Ok(())
}
