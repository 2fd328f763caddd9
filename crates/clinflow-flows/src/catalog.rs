use clinflow_artifact::ArtifactRegistry;
use clinflow_workflow::WorkflowDefinition;
use tracing::{debug, instrument};

use crate::defaults::FlowDefaults;
use crate::error::CatalogError;
use crate::flows;

type BuildFn = fn(&FlowDefaults, &mut ArtifactRegistry) -> Result<WorkflowDefinition, CatalogError>;

/// A flow that can be declared by id.
#[derive(Clone, Copy)]
pub struct FlowEntry {
  /// Stable id, e.g. `flow_2`.
  pub id: &'static str,
  /// Name of the declared workflow. Not unique across entries.
  pub workflow: &'static str,
  pub description: &'static str,
  build: BuildFn,
}

impl std::fmt::Debug for FlowEntry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FlowEntry")
      .field("id", &self.id)
      .field("workflow", &self.workflow)
      .finish_non_exhaustive()
  }
}

static FLOWS: [FlowEntry; 6] = [
  FlowEntry {
    id: "flow_1",
    workflow: "ADaM_only",
    description: "ADaM datasets from the SDTM snapshot",
    build: flows::adam_only,
  },
  FlowEntry {
    id: "flow_2",
    workflow: "ADaM_TFL",
    description: "ADaM datasets and TFL reports",
    build: flows::adam_tfl,
  },
  FlowEntry {
    id: "flow_3",
    workflow: "ADaM_only_QC",
    description: "Production and QC ADaM datasets",
    build: flows::adam_only_qc,
  },
  FlowEntry {
    id: "flow_4",
    workflow: "ADaM_TFL_QC",
    description: "Production and QC ADaM datasets and TFL reports",
    build: flows::adam_tfl_qc,
  },
  FlowEntry {
    id: "flow_5",
    workflow: "SDTM_ADaM_TFL",
    description: "SDTM transfer, ADaM datasets and TFL reports",
    build: flows::sdtm_adam_tfl,
  },
  FlowEntry {
    id: "dev/flow_5_all_SDTM",
    workflow: "SDTM_ADaM_TFL",
    description: "Development run transferring every SDTM domain, with caching",
    build: flows::sdtm_adam_tfl_all,
  },
];

/// The known flows, declared against one set of environment defaults.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  defaults: FlowDefaults,
}

impl Catalog {
  pub fn new(defaults: FlowDefaults) -> Self {
    Self { defaults }
  }

  pub fn entries(&self) -> &'static [FlowEntry] {
    &FLOWS
  }

  pub fn entry(&self, id: &str) -> Option<&'static FlowEntry> {
    FLOWS.iter().find(|entry| entry.id == id)
  }

  /// Declare the flow `id`, creating its artifact tags in `registry`.
  ///
  /// If the flow fails, tags it created are removed again.
  #[instrument(skip(self, registry))]
  pub fn build(
    &self,
    id: &str,
    registry: &mut ArtifactRegistry,
  ) -> Result<WorkflowDefinition, CatalogError> {
    let entry = self
      .entry(id)
      .ok_or_else(|| CatalogError::UnknownFlow(id.to_string()))?;

    let mark = registry.len();
    let workflow = (entry.build)(&self.defaults, registry).inspect_err(|_| {
      registry.truncate(mark);
    })?;
    debug!(
      workflow = %workflow.name(),
      nodes = workflow.nodes().len(),
      "declared flow"
    );
    Ok(workflow)
  }

  /// Declare every flow against one registry, in catalog order.
  pub fn build_all(
    &self,
    registry: &mut ArtifactRegistry,
  ) -> Result<Vec<(&'static FlowEntry, WorkflowDefinition)>, CatalogError> {
    let mut built = Vec::with_capacity(FLOWS.len());
    for entry in self.entries() {
      built.push((entry, self.build(entry.id, registry)?));
    }
    Ok(built)
  }
}
