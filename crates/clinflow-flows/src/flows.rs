use clinflow_artifact::ArtifactRegistry;
use clinflow_config::ValueType;
use clinflow_workflow::{ParameterSpec, WorkflowBuilder, WorkflowDefinition};

use crate::adam::{Track, add_snapshot_adam};
use crate::defaults::FlowDefaults;
use crate::error::CatalogError;
use crate::sdtm::{self, ALL_DOMAINS, FLOW_DOMAINS};
use crate::tfl::{ReportLayout, add_reports};

pub(crate) const SDTM_SNAPSHOT: &str = "sdtm_dataset_snapshot";
pub(crate) const METADATA_SNAPSHOT: &str = "metadata_snapshot";

fn snapshot_param(builder: &mut WorkflowBuilder) -> Result<ParameterSpec, CatalogError> {
  Ok(builder.declare_parameter(SDTM_SNAPSHOT, ValueType::String)?)
}

fn metadata_param(builder: &mut WorkflowBuilder) -> Result<ParameterSpec, CatalogError> {
  Ok(builder.declare_parameter(METADATA_SNAPSHOT, ValueType::String)?)
}

/// ADSL and its derived datasets.
pub(crate) fn adam_only(
  defaults: &FlowDefaults,
  registry: &mut ArtifactRegistry,
) -> Result<WorkflowDefinition, CatalogError> {
  let mut builder = WorkflowBuilder::new("ADaM_only");
  let snapshot = snapshot_param(&mut builder)?;
  let data = Track::Prod.dataset_tag(registry)?;

  add_snapshot_adam(&mut builder, Track::Prod, &data, &snapshot, &defaults.sas())?;
  Ok(builder.finalize()?)
}

/// ADaM datasets followed by the TFL reports.
pub(crate) fn adam_tfl(
  defaults: &FlowDefaults,
  registry: &mut ArtifactRegistry,
) -> Result<WorkflowDefinition, CatalogError> {
  let mut builder = WorkflowBuilder::new("ADaM_TFL");
  let snapshot = snapshot_param(&mut builder)?;
  let metadata = metadata_param(&mut builder)?;
  let data = Track::Prod.dataset_tag(registry)?;
  let reports = Track::Prod.report_tag(registry)?;
  let env = defaults.sas();

  let datasets = add_snapshot_adam(&mut builder, Track::Prod, &data, &snapshot, &env)?;
  add_reports(
    &mut builder,
    ReportLayout::PROD,
    &datasets,
    &metadata,
    &reports,
    &env,
  )?;
  Ok(builder.finalize()?)
}

/// Production and QC ADaM datasets side by side.
pub(crate) fn adam_only_qc(
  defaults: &FlowDefaults,
  registry: &mut ArtifactRegistry,
) -> Result<WorkflowDefinition, CatalogError> {
  let mut builder = WorkflowBuilder::new("ADaM_only_QC");
  let snapshot = snapshot_param(&mut builder)?;
  let env = defaults.sas();

  for track in [Track::Prod, Track::Qc] {
    let data = track.dataset_tag(registry)?;
    add_snapshot_adam(&mut builder, track, &data, &snapshot, &env)?;
  }
  Ok(builder.finalize()?)
}

/// Production and QC tracks, each with its own reports.
pub(crate) fn adam_tfl_qc(
  defaults: &FlowDefaults,
  registry: &mut ArtifactRegistry,
) -> Result<WorkflowDefinition, CatalogError> {
  let mut builder = WorkflowBuilder::new("ADaM_TFL_QC");
  let snapshot = snapshot_param(&mut builder)?;
  let metadata = metadata_param(&mut builder)?;
  let env = defaults.sas();

  let mut tracks = Vec::with_capacity(2);
  for track in [Track::Prod, Track::Qc] {
    let data = track.dataset_tag(registry)?;
    let datasets = add_snapshot_adam(&mut builder, track, &data, &snapshot, &env)?;
    tracks.push(datasets);
  }

  for (layout, datasets) in [ReportLayout::PROD, ReportLayout::QC].into_iter().zip(&tracks) {
    let reports = layout.track.report_tag(registry)?;
    add_reports(&mut builder, layout, datasets, &metadata, &reports, &env)?;
  }
  Ok(builder.finalize()?)
}

/// SDTM transfer, ADaM from the transferred domains, then reports.
pub(crate) fn sdtm_adam_tfl(
  defaults: &FlowDefaults,
  registry: &mut ArtifactRegistry,
) -> Result<WorkflowDefinition, CatalogError> {
  let mut builder = WorkflowBuilder::new("SDTM_ADaM_TFL");
  let snapshot = snapshot_param(&mut builder)?;
  let metadata = metadata_param(&mut builder)?;
  let data = Track::Prod.dataset_tag(registry)?;
  let reports = Track::Prod.report_tag(registry)?;
  let env = defaults.sas();

  let transferred =
    sdtm::add_transfer_nodes(&mut builder, &FLOW_DOMAINS, &snapshot, &defaults.transfer())?;
  let datasets = sdtm::add_sdtm_adam(&mut builder, &transferred, &data, &env)?;
  add_reports(
    &mut builder,
    ReportLayout::PROD,
    &datasets,
    &metadata,
    &reports,
    &env,
  )?;
  Ok(builder.finalize()?)
}

/// Development variant of `SDTM_ADaM_TFL`: transfers every domain and
/// caches the transfer and ADaM jobs.
pub(crate) fn sdtm_adam_tfl_all(
  defaults: &FlowDefaults,
  registry: &mut ArtifactRegistry,
) -> Result<WorkflowDefinition, CatalogError> {
  let mut builder = WorkflowBuilder::new("SDTM_ADaM_TFL");
  let snapshot = snapshot_param(&mut builder)?;
  let metadata = metadata_param(&mut builder)?;
  let data = Track::Prod.dataset_tag(registry)?;
  let reports = Track::Prod.report_tag(registry)?;

  let transferred = sdtm::add_transfer_nodes(
    &mut builder,
    &ALL_DOMAINS,
    &snapshot,
    &defaults.dev_transfer(),
  )?;
  let datasets =
    sdtm::add_sdtm_adam(&mut builder, &transferred, &data, &defaults.dev_sas_cached())?;
  add_reports(
    &mut builder,
    ReportLayout::DEV,
    &datasets,
    &metadata,
    &reports,
    &defaults.dev_sas(),
  )?;
  Ok(builder.finalize()?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_adam_only() {
    let mut registry = ArtifactRegistry::new();
    let workflow = adam_only(&FlowDefaults::default(), &mut registry).unwrap();

    assert_eq!(workflow.name(), "ADaM_only");
    assert_eq!(workflow.nodes().len(), 6);
    assert_eq!(workflow.parameters().len(), 1);

    let graph = workflow.graph();
    assert_eq!(graph.entry_points(), &["Create ADSL Dataset".to_string()]);
    assert_eq!(graph.downstream("Create ADSL Dataset").len(), 5);

    let adsl = workflow.node("Create ADSL Dataset").unwrap();
    assert_eq!(adsl.environment.image, "SAS Analytics Pro");
    assert_eq!(adsl.environment.hardware_tier.as_deref(), Some("Small"));
    assert!(adsl.environment.use_project_defaults_for_omitted);
  }

  #[test]
  fn test_adam_tfl_reports() {
    let mut registry = ArtifactRegistry::new();
    let workflow = adam_tfl(&FlowDefaults::default(), &mut registry).unwrap();

    assert_eq!(workflow.nodes().len(), 9);
    let t_pop = workflow.node("Create T_POP Report").unwrap();
    assert_eq!(t_pop.command, "prod/tfl/t_pop.sas");
    assert_eq!(t_pop.outputs[0].artifact.as_ref().unwrap().file_name, "t_pop");

    let t_vscat = workflow.node("Create T_VSCAT Report").unwrap();
    assert_eq!(t_vscat.upstream(), ["Create ADVS Dataset"]);
  }

  #[test]
  fn test_qc_flows_use_both_tracks() {
    let mut registry = ArtifactRegistry::new();
    let defaults = FlowDefaults::default();

    let only_qc = adam_only_qc(&defaults, &mut registry).unwrap();
    assert_eq!(only_qc.nodes().len(), 12);
    assert_eq!(only_qc.graph().entry_points().len(), 2);

    let tfl_qc = adam_tfl_qc(&defaults, &mut registry).unwrap();
    assert_eq!(tfl_qc.nodes().len(), 18);
    assert_eq!(tfl_qc.artifact_groups().len(), 4);

    let qc_t_pop = tfl_qc.node("Create QC T_POP Report").unwrap();
    assert_eq!(qc_t_pop.upstream(), ["Create QC ADSL Dataset"]);
  }

  #[test]
  fn test_sdtm_adam_tfl() {
    let mut registry = ArtifactRegistry::new();
    let workflow = sdtm_adam_tfl(&FlowDefaults::default(), &mut registry).unwrap();

    assert_eq!(workflow.nodes().len(), 16);
    assert_eq!(workflow.graph().entry_points().len(), 7);

    let ae = workflow.node("ae SDTM").unwrap();
    assert_eq!(ae.environment.image, "GxP R & Python");
    assert_eq!(ae.environment.hardware_tier.as_deref(), Some("Small"));

    let t_pop = workflow.node("Create T_POP Report").unwrap();
    assert_eq!(t_pop.command, "prod/tfl/t_pop.sas");
  }

  #[test]
  fn test_dev_flow_caches_and_names_pdfs() {
    let mut registry = ArtifactRegistry::new();
    let workflow = sdtm_adam_tfl_all(&FlowDefaults::default(), &mut registry).unwrap();

    assert_eq!(workflow.nodes().len(), 31);

    let ta = workflow.node("ta SDTM").unwrap();
    assert_eq!(ta.command, "utils/SDTM_transfer/ta.py");
    assert_eq!(ta.environment.cache.as_ref().unwrap().version, "1.0");
    assert!(ta.environment.hardware_tier.is_none());

    let adsl = workflow.node("Create ADSL Dataset").unwrap();
    assert!(adsl.environment.cache.is_some());

    let t_pop = workflow.node("Create T_POP Report").unwrap();
    assert_eq!(t_pop.command, "prod/tfl_flows/t_pop.sas");
    assert!(t_pop.environment.cache.is_none());
    assert_eq!(
      t_pop.outputs[0].artifact.as_ref().unwrap().file_name,
      "t_pop.pdf"
    );

    // Transferred but unused domains are leaves
    let graph = workflow.graph();
    assert!(graph.downstream("relrec SDTM").is_empty());
  }
}
