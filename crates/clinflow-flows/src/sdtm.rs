use std::collections::HashMap;
use std::sync::Arc;

use clinflow_artifact::ArtifactTag;
use clinflow_config::EnvironmentDef;
use clinflow_workflow::{InputBinding, OutputRef, OutputSpec, ParameterSpec, WorkflowBuilder};
use tracing::debug;

use crate::adam::{self, AdamOutputs, FileNaming, Track};
use crate::error::CatalogError;

/// Domains moved out of the snapshot by `flow_5`.
pub(crate) const FLOW_DOMAINS: [&str; 7] = ["ae", "cm", "dm", "ex", "lb", "mh", "vs"];

/// Every domain in the study snapshot.
pub(crate) const ALL_DOMAINS: [&str; 22] = [
  "ae", "cm", "dm", "ds", "ex", "lb", "mh", "qs", "relrec", "sc", "se", "suppae", "suppdm",
  "suppds", "supplb", "sv", "ta", "te", "ti", "ts", "tv", "vs",
];

/// SDTM domains each ADaM dataset reads, before ADSL.
const ADAM_SOURCES: [(&str, &[&str]); 6] = [
  ("ADSL", &["dm"]),
  ("ADAE", &["ae", "ex"]),
  ("ADCM", &["cm"]),
  ("ADLB", &["lb"]),
  ("ADMH", &["mh"]),
  ("ADVS", &["vs"]),
];

/// Transfer outputs keyed by domain.
#[derive(Debug, Default)]
pub(crate) struct SdtmOutputs {
  domains: HashMap<String, OutputRef>,
}

impl SdtmOutputs {
  fn input(&self, domain: &str) -> Result<InputBinding, CatalogError> {
    let output = self
      .domains
      .get(domain)
      .ok_or_else(|| CatalogError::MissingDataset(domain.to_string()))?;
    Ok(InputBinding::new(domain, adam::dataset_type(), output.clone()))
  }
}

/// One transfer job per domain, copying `<domain>.sas7bdat` out of the
/// snapshot into the job's outputs.
pub(crate) fn add_transfer_nodes(
  builder: &mut WorkflowBuilder,
  domains: &[&str],
  snapshot: &ParameterSpec,
  env: &EnvironmentDef,
) -> Result<SdtmOutputs, CatalogError> {
  let mut outputs = SdtmOutputs::default();

  for domain in domains {
    let handle = builder.add_job_node(
      format!("{} SDTM", domain),
      format!("utils/SDTM_transfer/{}.py", domain),
      vec![adam::snapshot_input(snapshot)],
      vec![OutputSpec::new(*domain, adam::dataset_type())],
      env.clone(),
    )?;
    outputs
      .domains
      .insert(domain.to_string(), handle.output(domain)?);
  }

  debug!(domains = domains.len(), "declared SDTM transfer nodes");
  Ok(outputs)
}

/// ADaM datasets built from transferred SDTM domains instead of the raw
/// snapshot.
pub(crate) fn add_sdtm_adam(
  builder: &mut WorkflowBuilder,
  sdtm: &SdtmOutputs,
  tag: &Arc<ArtifactTag>,
  env: &EnvironmentDef,
) -> Result<AdamOutputs, CatalogError> {
  let mut outputs = AdamOutputs::new(Track::Prod);

  for (domain, sources) in ADAM_SOURCES {
    let mut inputs = sources
      .iter()
      .map(|source| sdtm.input(source))
      .collect::<Result<Vec<_>, _>>()?;
    if domain != "ADSL" {
      inputs.push(outputs.input("ADSL")?);
    }

    let stem = domain.to_lowercase();
    let output_name = format!("{}_dataset", stem);
    let file_name = FileNaming::WithExtension.file_name(&stem, "sas7bdat");

    let handle = builder.add_job_node(
      format!("Create {} Dataset", domain),
      format!("prod/adam_flows_sdtm/{}.sas", domain),
      inputs,
      vec![OutputSpec::new(&output_name, adam::dataset_type()).tagged(tag, file_name)],
      env.clone(),
    )?;
    outputs.insert(domain, handle.output(&output_name)?);
  }

  Ok(outputs)
}

#[cfg(test)]
mod tests {
  use super::*;
  use clinflow_artifact::ArtifactRegistry;
  use clinflow_config::ValueType;

  #[test]
  fn test_domain_lists() {
    assert!(FLOW_DOMAINS.iter().all(|d| ALL_DOMAINS.contains(d)));
    let mut sorted = ALL_DOMAINS;
    sorted.sort();
    assert_eq!(sorted, ALL_DOMAINS);
  }

  #[test]
  fn test_adam_from_sdtm() {
    let mut registry = ArtifactRegistry::new();
    let tag = Track::Prod.dataset_tag(&mut registry).unwrap();
    let mut builder = WorkflowBuilder::new("sdtm");
    let snapshot = builder
      .declare_parameter("sdtm_dataset_snapshot", ValueType::String)
      .unwrap();
    let env = EnvironmentDef::new("SAS Analytics Pro");

    let sdtm = add_transfer_nodes(&mut builder, &FLOW_DOMAINS, &snapshot, &env).unwrap();
    add_sdtm_adam(&mut builder, &sdtm, &tag, &env).unwrap();
    let workflow = builder.finalize().unwrap();

    let transfer = workflow.node("ae SDTM").unwrap();
    assert_eq!(transfer.command, "utils/SDTM_transfer/ae.py");
    assert!(transfer.outputs[0].artifact.is_none());

    let adae = workflow.node("Create ADAE Dataset").unwrap();
    let names: Vec<_> = adae.inputs.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["ae", "ex", "adsl_dataset"]);
    assert_eq!(adae.upstream(), ["ae SDTM", "ex SDTM", "Create ADSL Dataset"]);
    assert_eq!(
      adae.outputs[0].artifact.as_ref().unwrap().file_name,
      "adae.sas7bdat"
    );
  }

  #[test]
  fn test_adam_without_transfer_fails() {
    let mut registry = ArtifactRegistry::new();
    let tag = Track::Prod.dataset_tag(&mut registry).unwrap();
    let mut builder = WorkflowBuilder::new("sdtm");
    let snapshot = builder
      .declare_parameter("sdtm_dataset_snapshot", ValueType::String)
      .unwrap();
    let env = EnvironmentDef::new("SAS Analytics Pro");

    let sdtm = add_transfer_nodes(&mut builder, &["ae", "cm"], &snapshot, &env).unwrap();
    let err = add_sdtm_adam(&mut builder, &sdtm, &tag, &env).unwrap_err();
    assert!(matches!(err, CatalogError::MissingDataset(ref d) if d == "dm"));
  }
}
