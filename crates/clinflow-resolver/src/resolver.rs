use clinflow_artifact::ArtifactRegistry;
use clinflow_config::{InputSource, JobNodeDef, WorkflowDef};
use clinflow_workflow::{
  BindingSource, InputBinding, OutputRef, OutputSpec, WorkflowBuilder, WorkflowDefinition,
};
use tracing::{info, warn};

use crate::error::ResolveError;

/// Resolver transforms a WorkflowDef into a validated WorkflowDefinition.
pub trait Resolver {
  /// Resolve a workflow definition.
  ///
  /// This process:
  /// 1. Declares the parameters
  /// 2. Resolves artifact tag names against the registry
  /// 3. Replays the nodes through the builder in file order
  fn resolve(&mut self, def: WorkflowDef) -> Result<WorkflowDefinition, ResolveError>;
}

/// Standard resolver implementation backed by the process artifact registry.
pub struct StandardResolver<'r> {
  registry: &'r mut ArtifactRegistry,
}

impl<'r> StandardResolver<'r> {
  /// Create a new resolver with the given artifact registry.
  pub fn new(registry: &'r mut ArtifactRegistry) -> Self {
    Self { registry }
  }

  fn convert_inputs(node_def: &JobNodeDef) -> Vec<InputBinding> {
    node_def
      .inputs
      .iter()
      .map(|input| {
        let source = match &input.source {
          InputSource::Literal { value } => BindingSource::literal(value),
          InputSource::Parameter { parameter } => BindingSource::parameter(parameter),
          InputSource::Output { node, output } => OutputRef::new(node, output).into(),
        };
        InputBinding::new(&input.name, input.value_type.clone(), source)
      })
      .collect()
  }

  fn convert_outputs(&mut self, node_def: &JobNodeDef) -> Result<Vec<OutputSpec>, ResolveError> {
    let mut outputs = Vec::with_capacity(node_def.outputs.len());
    for output in &node_def.outputs {
      let mut spec = OutputSpec::new(&output.name, output.value_type.clone());
      if let Some(artifact) = &output.artifact {
        let tag = self
          .registry
          .get_or_create_tag(&artifact.tag.name, artifact.tag.category)?;
        spec = spec.tagged(&tag, &artifact.file_name);
      }
      outputs.push(spec);
    }
    Ok(outputs)
  }
}

impl StandardResolver<'_> {
  fn replay(&mut self, def: WorkflowDef) -> Result<WorkflowDefinition, ResolveError> {
    let mut builder = WorkflowBuilder::new(&def.name);

    for param in def.parameters {
      builder.declare_parameter(param.name, param.value_type)?;
    }

    for node_def in def.nodes {
      let inputs = Self::convert_inputs(&node_def);
      let outputs = self.convert_outputs(&node_def)?;
      builder.add_job_node(
        node_def.name,
        node_def.command,
        inputs,
        outputs,
        node_def.environment,
      )?;
    }

    Ok(builder.finalize()?)
  }
}

impl Resolver for StandardResolver<'_> {
  /// Tags first created while resolving a workflow that fails are removed
  /// from the registry again.
  fn resolve(&mut self, def: WorkflowDef) -> Result<WorkflowDefinition, ResolveError> {
    let name = def.name.clone();
    let mark = self.registry.len();

    match self.replay(def) {
      Ok(workflow) => {
        info!(
          workflow = %workflow.name(),
          nodes = workflow.nodes().len(),
          "resolved workflow"
        );
        Ok(workflow)
      }
      Err(e) => {
        self.registry.truncate(mark);
        warn!(workflow = %name, error = %e, "failed to resolve workflow");
        Err(e)
      }
    }
  }
}
